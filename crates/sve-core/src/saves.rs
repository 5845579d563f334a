use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

pub const SHORTCUTS_FILE: &str = "shortcuts.vdf";

/// A file is taken as is; a directory resolves to the `shortcuts.vdf` inside it.
pub fn resolve_shortcuts_path(p: &Path) -> Result<PathBuf> {
    if p.is_file() {
        return Ok(p.to_path_buf());
    }
    let joined = p.join(SHORTCUTS_FILE);
    if p.is_dir() && joined.is_file() {
        return Ok(joined);
    }
    Err(Error::NotFound(p.to_path_buf()))
}

/// Every `shortcuts.vdf` below `root` (e.g. a client `userdata` directory),
/// sorted.
pub fn find_shortcuts_files(root: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == SHORTCUTS_FILE)
        .map(|e| e.into_path())
        .collect();
    out.sort();
    out
}
