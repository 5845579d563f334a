use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::{Error, Result};
use crate::shortcuts::Shortcuts;

#[derive(Clone, Copy, Debug)]
pub struct StoreOpts {
    /// Overwrite an existing destination.
    pub force: bool,
    /// Zip the existing destination before overwriting it.
    pub backup: bool,
}

impl Default for StoreOpts {
    fn default() -> Self {
        Self {
            force: false,
            backup: true,
        }
    }
}

/// Applies one `(index, key, value)` edit. When `index` does not exist a new
/// record is appended (see [`Shortcuts::get_or_create`]). Returns whether a
/// record was created.
pub fn apply_edit(scs: &mut Shortcuts, index: u32, key: &str, value: &str) -> Result<bool> {
    let created = scs.get_or_create(index, |_, sc| sc.set_from_str(key, value))?;
    tracing::debug!(index, key, created, "applied edit");
    Ok(created)
}

/// Stores `scs` at `path` honoring `opts`. Returns the backup archive path
/// when one was written.
pub fn store_with(scs: &Shortcuts, path: &Path, opts: &StoreOpts) -> Result<Option<PathBuf>> {
    let mut backup = None;
    if path.exists() {
        if !opts.force {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        if opts.backup {
            let dest = zip_backup_file(path)?;
            tracing::info!(backup = %dest.display(), "backed up existing file");
            backup = Some(dest);
        }
    }
    scs.store_into(path)?;
    Ok(backup)
}

// Zip backup of a single file, written next to it (non-destructive)
pub fn zip_backup_file(path: &Path) -> io::Result<PathBuf> {
    if !path.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a file"));
    }
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("shortcuts.vdf");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("shortcuts");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", stem, ts));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(name, options)?;
    zip.write_all(&fs::read(path)?)?;
    zip.finish()?;
    Ok(dest)
}
