//! Source-unit discovery under a data root.

use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

/// Every `.json` source unit under `root`, recursively, in sorted order.
///
/// The sort gives re-runs a stable unit order; anything that is not a
/// `.json` file is ignored.
pub fn source_units(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut units = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.with_context(|| format!("walk data root {}", root.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            units.push(entry.into_path());
        }
    }
    units.sort();
    Ok(units)
}
