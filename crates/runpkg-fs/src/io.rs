//! Atomic I/O operations with file locking

use crate::{Error, Result};
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partially
/// written document. Each call stages into its own uniquely named temp file,
/// so concurrent writers to one path never share staging data and the last
/// rename wins. An advisory lock is held on the temp file while writing.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    // Same directory keeps the rename on one filesystem
    let mut staged = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;

    staged.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    staged
        .write_all(content)
        .map_err(|e| Error::io(staged.path(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(staged.path(), e))?;

    staged.as_file().unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    // A failed persist drops the temp file, which removes it.
    staged.persist(path).map_err(|e| Error::io(path, e.error))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Create a directory and all of its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
