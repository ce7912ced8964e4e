use std::path::Path;

use anyhow::Context;
use bclyt::{
    dump::{apply_dump, LayoutDump},
    text::{inject_strings, Catalog},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_layout, read_text, save_layout},
    output::print_output,
};

#[derive(Debug, Serialize)]
pub struct ImportInfo {
    pub file: String,
    pub output: String,
    pub dump_applied: bool,
    pub strings_updated: usize,
}

/// Decode `original`, apply whichever of `dump_in` and `po_in` are given, encode into `output`.
pub fn import_layout(
    original: &Path,
    dump_in: Option<&Path>,
    po_in: Option<&Path>,
    output: &Path,
) -> anyhow::Result<ImportInfo> {
    let mut layout = load_layout(original)?;

    if let Some(path) = dump_in {
        let dump = LayoutDump::from_json(&read_text(path)?)
            .with_context(|| format!("invalid dump: {}", path.display()))?;
        apply_dump(&mut layout, &dump)
            .with_context(|| format!("failed to apply {}", path.display()))?;
    }

    let mut strings_updated = 0;
    if let Some(path) = po_in {
        let catalog = Catalog::from_po(&read_text(path)?)
            .with_context(|| format!("invalid catalog: {}", path.display()))?;
        strings_updated = inject_strings(&mut layout, &catalog.to_entries())
            .with_context(|| format!("failed to apply {}", path.display()))?;
    }

    save_layout(&layout, output)?;

    Ok(ImportInfo {
        file: file_display_name(original),
        output: output.display().to_string(),
        dump_applied: dump_in.is_some(),
        strings_updated,
    })
}

pub fn run(
    original: &Path,
    dump_in: Option<&Path>,
    po_in: Option<&Path>,
    output: &Path,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    if dump_in.is_none() && po_in.is_none() {
        anyhow::bail!("nothing to import, pass --dump and/or --po");
    }

    let info = import_layout(original, dump_in, po_in, output)?;

    print_output(&info, opts, |info| {
        let dump = if info.dump_applied { "applied" } else { "-" };
        println!(
            "{} -> {} (dump: {dump}, strings updated: {})",
            info.file, info.output, info.strings_updated
        );
    })
}
