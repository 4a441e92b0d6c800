//! The game library
//!
//! A persistent index of known packages, stored as `library.json` in the
//! config root. Entries are keyed by the absolute package path and hold the
//! manifest summary read when the package was added, so listing the library
//! never has to open a container.

use crate::descriptor::{PackageLoader, validate_package};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const LIBRARY_FILE_NAME: &str = "library.json";

/// What the library remembers about one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    pub platform: String,
    pub main: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub added: DateTime<Utc>,
}

impl LibraryEntry {
    fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            name: manifest.name.clone(),
            platform: manifest.platform.clone(),
            main: manifest.main.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            added: Utc::now(),
        }
    }
}

/// Packages the user has added, persisted after every change.
#[derive(Debug)]
pub struct GameLibrary {
    path: PathBuf,
    entries: BTreeMap<PathBuf, LibraryEntry>,
}

impl GameLibrary {
    /// Open the library file at `path`.
    ///
    /// A missing file is an empty library. A malformed one is an error, so
    /// the next save cannot silently discard it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            runpkg_fs::load_document(&path)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), games = entries.len(), "Opened game library");
        Ok(Self { path, entries })
    }

    /// Open `library.json` inside `config_dir`.
    pub fn in_dir(config_dir: &Path) -> Result<Self> {
        Self::open(config_dir.join(LIBRARY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the manifest of `package_path` and record it.
    ///
    /// The package is extracted into a scratch directory that is removed
    /// before this returns. Adding a package twice refreshes its entry.
    pub fn add(&mut self, package_path: &Path) -> Result<&LibraryEntry> {
        validate_package(package_path)?;
        let key = library_key(package_path)?;

        let scratch = tempfile::TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let loaded = PackageLoader::new(scratch.path()).load(&key)?;
        let entry = LibraryEntry::from_manifest(loaded.manifest());
        if let Err(e) = scratch.close() {
            tracing::warn!(error = %e, "Failed to remove scratch extraction directory");
        }

        let replaced = self.entries.insert(key.clone(), entry).is_some();
        self.save()?;
        tracing::info!(package = %key.display(), replaced, "Added package to library");

        self.entries
            .get(&key)
            .ok_or_else(|| Error::PackageNotFound { path: key.clone() })
    }

    /// Forget `package_path`. The package file itself is left alone.
    pub fn remove(&mut self, package_path: &Path) -> Result<Option<LibraryEntry>> {
        let key = library_key(package_path)?;
        let removed = self.entries.remove(&key);
        if removed.is_some() {
            self.save()?;
            tracing::info!(package = %key.display(), "Removed package from library");
        }
        Ok(removed)
    }

    /// Drop entries whose package file no longer exists.
    pub fn prune_missing(&mut self) -> Result<Vec<PathBuf>> {
        let missing: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|path| !path.is_file())
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(missing);
        }
        for path in &missing {
            self.entries.remove(path);
        }
        self.save()?;
        tracing::info!(count = missing.len(), "Pruned missing packages from library");
        Ok(missing)
    }

    pub fn get(&self, package_path: &Path) -> Option<&LibraryEntry> {
        let key = library_key(package_path).ok()?;
        self.entries.get(&key)
    }

    /// Entries in package path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &LibraryEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        runpkg_fs::save_document(&self.path, &self.entries)?;
        Ok(())
    }
}

/// Absolute form of `path`, without resolving symlinks so a deleted
/// package can still be removed by the path it was added under.
fn library_key(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(path, e))
}
