//! Loading packages from disk
//!
//! Loading runs three stages in order: validate the container path, extract
//! it into a fresh directory, then parse and check the manifest. A
//! [`PackageDescriptor`] only exists once all three succeeded, so callers can
//! never observe a partially loaded package.

use crate::error::{Error, Result};
use crate::manifest::{GAME_DIR, MANIFEST_FILE_NAME, Manifest};
use runpkg_archive::{Archiver, TarGzArchiver};
use runpkg_config::ConfigStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extension of package containers, without the dot.
pub const PACKAGE_EXTENSION: &str = "runpkg";

pub fn is_package_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PACKAGE_EXTENSION)
}

/// Check that `path` names an existing package container.
pub fn validate_package(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::PackageNotFound {
            path: path.to_path_buf(),
        });
    }
    if !is_package_path(path) {
        return Err(Error::WrongExtension {
            path: path.to_path_buf(),
            expected: PACKAGE_EXTENSION.to_string(),
        });
    }
    Ok(())
}

/// A fully loaded package.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    package_path: PathBuf,
    extracted_root: PathBuf,
    manifest: Manifest,
}

impl PackageDescriptor {
    pub fn package_path(&self) -> &Path {
        &self.package_path
    }

    pub fn extracted_root(&self) -> &Path {
        &self.extracted_root
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn platform(&self) -> &str {
        &self.manifest.platform
    }

    /// Entry point relative to [`Self::game_dir`].
    pub fn main(&self) -> &str {
        &self.manifest.main
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn description(&self) -> Option<&str> {
        self.manifest.description.as_deref()
    }

    /// Package-level config overrides.
    pub fn config(&self) -> &ConfigStore {
        &self.manifest.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn game_dir(&self) -> PathBuf {
        self.extracted_root.join(GAME_DIR)
    }

    pub fn entry_point(&self) -> PathBuf {
        self.manifest.entry_point(&self.extracted_root)
    }

    /// Delete the extracted files.
    pub fn remove_extracted(&self) -> Result<()> {
        fs::remove_dir_all(&self.extracted_root).map_err(|e| Error::io(&self.extracted_root, e))?;
        tracing::debug!(path = %self.extracted_root.display(), "Removed extracted package");
        Ok(())
    }
}

/// Loads packages into uniquely named directories under an extraction root.
#[derive(Debug, Clone)]
pub struct PackageLoader {
    extraction_root: PathBuf,
    archiver: Arc<dyn Archiver>,
}

impl PackageLoader {
    pub fn new(extraction_root: impl Into<PathBuf>) -> Self {
        Self {
            extraction_root: extraction_root.into(),
            archiver: Arc::new(TarGzArchiver::new()),
        }
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn extraction_root(&self) -> &Path {
        &self.extraction_root
    }

    /// Validate, extract and parse the package at `package_path`.
    ///
    /// Each call extracts into its own `<stem>-<uuid>` directory. If
    /// extraction or manifest parsing fails, that directory is removed.
    pub fn load(&self, package_path: &Path) -> Result<PackageDescriptor> {
        validate_package(package_path)?;
        tracing::debug!(package = %package_path.display(), "Package validated");

        let extracted_root = self.extraction_dir(package_path);
        fs::create_dir_all(&extracted_root).map_err(|e| Error::io(&extracted_root, e))?;

        let loaded = self
            .archiver
            .extract(package_path, &extracted_root)
            .map_err(Error::from)
            .and_then(|()| {
                tracing::debug!(dir = %extracted_root.display(), "Package extracted");
                load_manifest(&extracted_root)
            });

        match loaded {
            Ok(manifest) => {
                tracing::debug!(name = %manifest.name, platform = %manifest.platform, "Manifest parsed");
                Ok(PackageDescriptor {
                    package_path: package_path.to_path_buf(),
                    extracted_root,
                    manifest,
                })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&extracted_root) {
                    tracing::warn!(
                        dir = %extracted_root.display(),
                        error = %cleanup,
                        "Failed to remove extraction directory"
                    );
                }
                Err(e)
            }
        }
    }

    fn extraction_dir(&self, package_path: &Path) -> PathBuf {
        let stem = package_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package".to_string());
        self.extraction_root
            .join(format!("{}-{}", stem, uuid::Uuid::new_v4().simple()))
    }
}

fn load_manifest(extracted_root: &Path) -> Result<Manifest> {
    let manifest = Manifest::from_file(&extracted_root.join(MANIFEST_FILE_NAME))?;

    let entry_point = manifest.entry_point(extracted_root);
    if !entry_point.is_file() {
        return Err(Error::EntryPointNotFound { path: entry_point });
    }
    Ok(manifest)
}
