//! The archive collaborator used by package loading and packaging

use crate::error::Result;
use std::path::Path;

/// Creates and extracts package containers.
///
/// Implementations must leave `dest` containing exactly the tree that was
/// packed from `source_dir`, and must never write outside `dest`.
pub trait Archiver: Send + Sync + std::fmt::Debug {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Unpack `archive` into the existing or creatable directory `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;

    /// Pack the contents of `source_dir` (not the directory itself) into `archive`.
    fn create(&self, source_dir: &Path, archive: &Path) -> Result<()>;
}
