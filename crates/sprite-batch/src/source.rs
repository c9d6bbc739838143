use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

/// Identifiers from list-file text: one per line, trimmed, blank lines ignored.
pub fn parse_identifier_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read a list file of identifiers.
pub fn read_identifier_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read identifier list: {}", path.display()))?;
    Ok(parse_identifier_list(&text))
}

/// Every directory under `root` (including `root`), depth-first, children in name order.
///
/// Identifiers keep `root` as given, so a walk of `1004` yields `1004`,
/// `1004/0001`, `1004/0001/0002`, ...
pub fn walk_entity_dirs(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        anyhow::bail!("Input directory not found: {}", root.display());
    }
    let mut identifiers = Vec::new();
    walk(root, &mut identifiers);
    Ok(identifiers)
}

fn walk(dir: &Path, out: &mut Vec<String>) {
    out.push(dir.to_string_lossy().into_owned());

    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("cannot read directory {}: {e}", dir.display());
            return;
        }
    };
    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    for child in children {
        walk(&child, out);
    }
}
