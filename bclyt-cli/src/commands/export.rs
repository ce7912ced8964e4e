use std::path::Path;

use bclyt::{
    dump::dump,
    text::{extract_strings, Catalog},
    Layout,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_layout, write_text},
    output::print_output,
};

#[derive(Debug, Serialize)]
pub struct ExportInfo {
    pub file: String,
    pub panels: usize,
    pub strings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po: Option<String>,
}

/// Write the dump and/or catalog of an already decoded layout.
pub fn export_layout(
    layout: &Layout,
    source: &Path,
    dump_out: Option<&Path>,
    po_out: Option<&Path>,
) -> anyhow::Result<ExportInfo> {
    let strings = extract_strings(layout);

    if let Some(out) = dump_out {
        write_text(out, &dump(layout).to_json()?)?;
    }

    if let Some(out) = po_out {
        write_text(out, &Catalog::from_entries(&strings).to_po())?;
    }

    Ok(ExportInfo {
        file: file_display_name(source),
        panels: layout.panels().count(),
        strings: strings.len(),
        dump: dump_out.map(|p| p.display().to_string()),
        po: po_out.map(|p| p.display().to_string()),
    })
}

pub fn run(
    path: &Path,
    dump_out: Option<&Path>,
    po_out: Option<&Path>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    if dump_out.is_none() && po_out.is_none() {
        anyhow::bail!("nothing to export, pass --dump and/or --po");
    }

    let layout = load_layout(path)?;
    let info = export_layout(&layout, path, dump_out, po_out)?;

    print_output(&info, opts, |info| {
        println!(
            "{}: {} panels, {} strings",
            info.file, info.panels, info.strings
        );
        if let Some(dump) = &info.dump {
            println!("  dump    -> {dump}");
        }
        if let Some(po) = &info.po {
            println!("  catalog -> {po}");
        }
    })
}
