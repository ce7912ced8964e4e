use std::path::{Path, PathBuf};

use anyhow::Context;
use bclyt::Layout;
use rayon::prelude::*;

/// Decode a layout file.
pub fn load_layout(path: &Path) -> anyhow::Result<Layout> {
    Layout::from_file(path).with_context(|| format!("failed to load layout: {}", path.display()))
}

/// Encode `layout` into `path`, creating parent directories as needed.
pub fn save_layout(layout: &Layout, path: &Path) -> anyhow::Result<()> {
    create_parent(path)?;
    layout
        .write_to_file(path)
        .with_context(|| format!("failed to write layout: {}", path.display()))
}

/// Write a text file, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Read a text file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Collect all `.bclyt` files recursively from a directory.
pub fn collect_layouts(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_layouts_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_layouts_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_layouts_recursive(&path, files)?;
        } else if is_layout_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns true if the path has a `.bclyt` extension.
pub fn is_layout_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("bclyt"))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

/// Run `process` on every layout below `dir` in parallel.
///
/// Failures are logged and counted, they do not stop the other files. Results keep the sorted
/// file order.
pub fn process_directory<T, F>(dir: &Path, process: F) -> anyhow::Result<(Vec<T>, usize)>
where
    T: Send,
    F: Fn(&Path) -> anyhow::Result<T> + Sync,
{
    let files = collect_layouts(dir)?;
    log::info!("Processing {} layouts below {}", files.len(), dir.display());

    let outcomes: Vec<anyhow::Result<T>> = files
        .par_iter()
        .map(|file| process(file.as_path()))
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut fail_count = 0;
    for (file, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(error) => {
                log::warn!("{}: {error:#}", file.display());
                fail_count += 1;
            }
        }
    }

    Ok((results, fail_count))
}

/// `path` relative to `base`, for mirroring a directory tree.
pub fn relative_to<'a>(path: &'a Path, base: &Path) -> anyhow::Result<&'a Path> {
    path.strip_prefix(base)
        .with_context(|| format!("{} is not below {}", path.display(), base.display()))
}
