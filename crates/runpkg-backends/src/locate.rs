//! Finding the external programs backends depend on

use std::path::{Path, PathBuf};

/// Resolve a program by configured path, then `PATH`, then fixed candidates.
///
/// An empty `configured` value means "not set". A configured path that does
/// not exist is reported and skipped.
pub fn find_program(configured: &str, name: &str, candidates: &[&str]) -> Option<PathBuf> {
    if !configured.is_empty() {
        let path = Path::new(configured);
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        tracing::warn!(path = configured, "Configured program path does not exist");
    }

    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}
