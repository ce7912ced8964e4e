use std::path::Path;

use anyhow::Context;
use bclyt::Layout;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, process_directory},
    output::print_output,
};

#[derive(Debug, Serialize)]
pub struct VerifyInfo {
    pub file: String,
    pub original_size: usize,
    pub encoded_size: usize,
    pub identical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_difference: Option<usize>,
}

/// First byte offset where `a` and `b` differ, or the shorter length if one is a prefix.
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Decode then re-encode one file and compare the bytes.
pub fn verify_file(path: &Path) -> anyhow::Result<VerifyInfo> {
    let original =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let layout = Layout::decode(&original)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let encoded = layout
        .encode()
        .with_context(|| format!("failed to encode {}", path.display()))?;

    let difference = first_difference(&original, &encoded);
    if let Some(offset) = difference {
        log::debug!("{}: first difference at {offset:#x}", path.display());
    }

    Ok(VerifyInfo {
        file: file_display_name(path),
        original_size: original.len(),
        encoded_size: encoded.len(),
        identical: difference.is_none(),
        first_difference: difference,
    })
}

fn print_result(info: &VerifyInfo) {
    match info.first_difference {
        None => println!("{}: OK ({} bytes)", info.file, info.original_size),
        Some(offset) => println!(
            "{}: MISMATCH at {offset:#x} ({} -> {} bytes)",
            info.file, info.original_size, info.encoded_size
        ),
    }
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    results: Vec<VerifyInfo>,
    failed: usize,
}

/// `verify PATH`: a single layout, or every layout below a directory.
pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let report = if path.is_dir() {
        let (results, failed) = process_directory(path, verify_file)?;
        VerifyReport { results, failed }
    } else {
        VerifyReport {
            results: vec![verify_file(path)?],
            failed: 0,
        }
    };

    print_output(&report, opts, |report| {
        for info in &report.results {
            print_result(info);
        }
        if report.results.len() + report.failed > 1 {
            println!();
            println!(
                "Verified {} files, {} failed to decode",
                report.results.len() + report.failed,
                report.failed
            );
        }
    })?;

    let mismatched = report.results.iter().filter(|r| !r.identical).count();
    if mismatched > 0 || report.failed > 0 {
        anyhow::bail!(
            "{mismatched} file(s) did not round-trip, {} failed",
            report.failed
        );
    }
    Ok(())
}
