use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::{
        common::{load_layout, process_directory, relative_to},
        export::{export_layout, ExportInfo},
        import::{import_layout, ImportInfo},
    },
    output::print_output,
};

#[derive(Debug, Serialize)]
struct BatchInfo<T> {
    results: Vec<T>,
    total_files: usize,
    failed: usize,
}

fn finish<T: Serialize>(
    results: Vec<T>,
    failed: usize,
    opts: &GlobalOptions,
    display: impl Fn(&T),
) -> anyhow::Result<()> {
    let batch = BatchInfo {
        total_files: results.len() + failed,
        results,
        failed,
    };

    print_output(&batch, opts, |batch| {
        for result in &batch.results {
            display(result);
        }
        println!();
        println!(
            "Processed {} files, {} failed",
            batch.total_files, batch.failed
        );
    })?;

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed");
    }
    Ok(())
}

/// `export-dir IN OUT`: `IN/a/b.bclyt` -> `OUT/a/b.json` and `OUT/a/b.po`.
pub fn export_dir(input: &Path, output: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (results, failed) = process_directory(input, |file| -> anyhow::Result<ExportInfo> {
        let relative = relative_to(file, input)?;
        let layout = load_layout(file)?;
        let dump = output.join(relative).with_extension("json");
        let po = output.join(relative).with_extension("po");

        let mut info = export_layout(&layout, file, Some(&dump), Some(&po))?;
        info.file = relative.display().to_string();
        Ok(info)
    })?;

    finish(results, failed, opts, |info| {
        println!(
            "{}: {} panels, {} strings",
            info.file, info.panels, info.strings
        );
    })
}

/// `import-dir ORIGINAL IN OUT`: `ORIGINAL/a/b.bclyt` + `IN/a/b.{json,po}` -> `OUT/a/b.bclyt`.
///
/// Missing `.json` or `.po` files are fine, a layout with neither is copied through the codec
/// unchanged.
pub fn import_dir(
    original: &Path,
    input: &Path,
    output: &Path,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let (results, failed) = process_directory(original, |file| -> anyhow::Result<ImportInfo> {
        let relative = relative_to(file, original)?;
        let dump = input.join(relative).with_extension("json");
        let po = input.join(relative).with_extension("po");

        let mut info = import_layout(
            file,
            dump.is_file().then_some(dump.as_path()),
            po.is_file().then_some(po.as_path()),
            &output.join(relative),
        )?;
        info.file = relative.display().to_string();
        Ok(info)
    })?;

    finish(results, failed, opts, |info| {
        println!(
            "{}: strings updated {}{}",
            info.file,
            info.strings_updated,
            if info.dump_applied { ", dump applied" } else { "" }
        );
    })
}
