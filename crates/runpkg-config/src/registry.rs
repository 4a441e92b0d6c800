//! Config registry: system and per-platform stores with on-disk layout
//!
//! The registry owns one system store and one store per platform. Files are
//! laid out under a single config root:
//!
//! ```text
//! <root>/system.json
//! <root>/emulators/<platform>.json
//! ```
//!
//! Missing files are synthesized from the built-in defaults and persisted
//! right away. Stores are flushed back to disk when the registry is dropped,
//! except platforms whose file could not be read: those keep their file
//! until they are saved or reset explicitly.
//!
//! Only the platform and package layers are merged per launch. The system
//! store holds process-wide settings (temp and output directories, logging)
//! and never takes part in a launch merge.

use crate::defaults::{SUPPORTED_PLATFORMS, platform_defaults, system_defaults};
use crate::error::{Error, Result};
use crate::store::ConfigStore;
use runpkg_fs::DocumentFormat;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Subdirectory of the config root holding per-platform files.
pub const PLATFORM_CONFIG_DIR: &str = "emulators";

const SYSTEM_CONFIG_STEM: &str = "system";

/// Validate that a platform identifier can safely name a config file.
pub fn validate_platform_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidPlatformId {
            id: id.to_string(),
            reason: "identifier must not be empty".to_string(),
        });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidPlatformId {
            id: id.to_string(),
            reason: "only ASCII letters, digits, '_' and '-' are allowed".to_string(),
        });
    }
    Ok(())
}

/// Owner of the system config and every platform config.
///
/// Construct one per process and hand it by reference to whatever needs
/// configuration. It is not meant for concurrent mutation.
#[derive(Debug)]
pub struct ConfigRegistry {
    root: PathBuf,
    format: DocumentFormat,
    system: ConfigStore,
    platforms: BTreeMap<String, ConfigStore>,
    unreadable: BTreeSet<String>,
    initialized: bool,
}

impl ConfigRegistry {
    /// Registry rooted at the config directory discovered from the environment.
    pub fn new() -> Self {
        Self::with_root(runpkg_fs::config_root())
    }

    /// Registry rooted at an explicit directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            format: DocumentFormat::default(),
            system: ConfigStore::new(),
            platforms: BTreeMap::new(),
            unreadable: BTreeSet::new(),
            initialized: false,
        }
    }

    /// Use a different document format for the files this registry owns.
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn system_config_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{}", SYSTEM_CONFIG_STEM, self.format.extension()))
    }

    pub fn platform_config_path(&self, platform: &str) -> PathBuf {
        self.root
            .join(PLATFORM_CONFIG_DIR)
            .join(format!("{}.{}", platform, self.format.extension()))
    }

    /// Create the directory layout and load or synthesize every config.
    ///
    /// Calling this again after it succeeded does nothing. It fails only
    /// when the directories cannot be created or an existing system config
    /// cannot be read. A broken platform file is left on disk untouched and
    /// that platform runs on defaults.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.ensure_directories()?;

        let system_path = self.system_config_path();
        self.system = if system_path.exists() {
            tracing::debug!(path = %system_path.display(), "Loading system config");
            ConfigStore::from_file(&system_path)?
        } else {
            let store = system_defaults();
            persist_synthesized(&store, &system_path);
            store
        };

        for platform in SUPPORTED_PLATFORMS {
            if self.platforms.contains_key(*platform) {
                continue;
            }
            let path = self.platform_config_path(platform);
            let store = self.load_or_synthesize(platform, &path);
            self.platforms.insert(platform.to_string(), store);
        }

        self.initialized = true;
        tracing::debug!(root = %self.root.display(), "Config registry initialized");
        Ok(())
    }

    fn ensure_directories(&self) -> Result<()> {
        for dir in [self.root.clone(), self.root.join(PLATFORM_CONFIG_DIR)] {
            runpkg_fs::io::ensure_dir(&dir).map_err(|source| {
                tracing::error!(path = %dir.display(), error = %source, "Failed to create configuration directory");
                Error::ConfigDirectory { path: dir.clone(), source }
            })?;
        }
        Ok(())
    }

    /// The live system store.
    pub fn system_config(&self) -> &ConfigStore {
        &self.system
    }

    /// Mutable access to the system store; persist with [`Self::save_system_config`].
    pub fn system_config_mut(&mut self) -> &mut ConfigStore {
        &mut self.system
    }

    /// The live store for `platform`, created on first use.
    ///
    /// A platform seen for the first time is loaded from disk if its file
    /// exists, otherwise synthesized from defaults and written immediately.
    /// Later calls return the same in-memory store without touching disk.
    pub fn platform_config(&mut self, platform: &str) -> Result<&mut ConfigStore> {
        validate_platform_id(platform)?;
        if !self.platforms.contains_key(platform) {
            let path = self.platform_config_path(platform);
            let store = self.load_or_synthesize(platform, &path);
            self.platforms.insert(platform.to_string(), store);
        }

        self.platforms
            .get_mut(platform)
            .ok_or_else(|| Error::PlatformNotLoaded {
                platform: platform.to_string(),
            })
    }

    /// Effective launch configuration: platform store overlaid with package values.
    ///
    /// Every key in `package_config` wins; keys only the platform defines
    /// keep the platform value. The platform store itself is not modified.
    pub fn merge_with_package_config(
        &mut self,
        package_config: &ConfigStore,
        platform: &str,
    ) -> Result<ConfigStore> {
        let mut merged = self.platform_config(platform)?.clone();
        merged.overlay(package_config);
        tracing::debug!(
            platform,
            overrides = package_config.len(),
            total = merged.len(),
            "Merged package config over platform config"
        );
        Ok(merged)
    }

    /// Replace a platform's store with the built-in defaults and persist it.
    pub fn reset_platform_config(&mut self, platform: &str) -> Result<&mut ConfigStore> {
        validate_platform_id(platform)?;
        let store = platform_defaults(platform);
        store.save(&self.platform_config_path(platform))?;
        self.unreadable.remove(platform);
        tracing::info!(platform, "Reset platform config to defaults");

        match self.platforms.entry(platform.to_string()) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = store;
                Ok(slot)
            }
            Entry::Vacant(entry) => Ok(entry.insert(store)),
        }
    }

    pub fn save_system_config(&self) -> Result<()> {
        self.system.save(&self.system_config_path())
    }

    /// Write one platform store, replacing its file even if it was unreadable.
    pub fn save_platform_config(&mut self, platform: &str) -> Result<()> {
        self.write_platform(platform)?;
        self.unreadable.remove(platform);
        Ok(())
    }

    fn write_platform(&self, platform: &str) -> Result<()> {
        validate_platform_id(platform)?;
        let store = self
            .platforms
            .get(platform)
            .ok_or_else(|| Error::PlatformNotLoaded {
                platform: platform.to_string(),
            })?;
        store.save(&self.platform_config_path(platform))
    }

    /// Persist every in-memory store, reporting the first failure.
    ///
    /// Platforms whose file could not be read at load time are skipped.
    pub fn save_all(&self) -> Result<()> {
        let mut first_error = self.save_system_config().err();
        for platform in self.platforms.keys() {
            if self.unreadable.contains(platform) {
                tracing::debug!(platform = %platform, "Not flushing over unreadable platform config");
                continue;
            }
            if let Err(e) = self.write_platform(platform) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Platforms with an in-memory store, sorted.
    pub fn loaded_platforms(&self) -> Vec<&str> {
        self.platforms.keys().map(String::as_str).collect()
    }

    /// Directory packages should be extracted under.
    ///
    /// A non-empty `temp_directory` in the system config overrides the
    /// default location in the OS temp directory.
    pub fn extraction_root(&self) -> PathBuf {
        let configured = self.system.get_string("temp_directory", "");
        if configured.is_empty() {
            runpkg_fs::extraction_root()
        } else {
            PathBuf::from(configured)
        }
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConfigRegistry {
    fn drop(&mut self) {
        if !self.initialized {
            return;
        }
        if let Err(e) = self.save_all() {
            tracing::warn!(error = %e, "Failed to flush configuration on shutdown");
        }
    }
}

impl ConfigRegistry {
    fn load_or_synthesize(&mut self, platform: &str, path: &Path) -> ConfigStore {
        if path.exists() {
            match ConfigStore::from_file(path) {
                Ok(store) => return store,
                Err(e) => {
                    tracing::warn!(
                        platform,
                        path = %path.display(),
                        error = %e,
                        "Unreadable platform config, using defaults without overwriting it"
                    );
                    self.unreadable.insert(platform.to_string());
                    return platform_defaults(platform);
                }
            }
        }

        let store = platform_defaults(platform);
        persist_synthesized(&store, path);
        store
    }
}

fn persist_synthesized(store: &ConfigStore, path: &Path) {
    match store.save(path) {
        Ok(()) => tracing::info!(path = %path.display(), "Created default config"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Could not persist default config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("linux")]
    #[case("xbox_series")]
    #[case("my-handheld")]
    fn accepts_valid_platform_ids(#[case] id: &str) {
        assert!(validate_platform_id(id).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("../system")]
    #[case("a/b")]
    #[case("linux.json")]
    fn rejects_invalid_platform_ids(#[case] id: &str) {
        let err = validate_platform_id(id).unwrap_err();
        assert_eq!(err.kind(), runpkg_fs::ErrorKind::Policy);
    }

    #[test]
    fn paths_follow_layout() {
        let registry = ConfigRegistry::with_root("/cfg");
        assert_eq!(registry.system_config_path(), PathBuf::from("/cfg/system.json"));
        assert_eq!(
            registry.platform_config_path("linux"),
            PathBuf::from("/cfg/emulators/linux.json")
        );
    }

    #[test]
    fn format_changes_extension() {
        let registry = ConfigRegistry::with_root("/cfg").with_format(DocumentFormat::Toml);
        assert_eq!(registry.system_config_path(), PathBuf::from("/cfg/system.toml"));
    }

    #[test]
    fn extraction_root_honours_temp_directory() {
        let temp = TempDir::new().unwrap();
        let mut registry = ConfigRegistry::with_root(temp.path());
        assert_eq!(registry.extraction_root(), runpkg_fs::extraction_root());

        registry
            .system_config_mut()
            .set_string("temp_directory", "/scratch/runpkg");
        assert_eq!(registry.extraction_root(), PathBuf::from("/scratch/runpkg"));
    }

    #[test]
    fn uninitialized_registry_does_not_flush_on_drop() {
        let temp = TempDir::new().unwrap();
        {
            let _registry = ConfigRegistry::with_root(temp.path());
        }
        assert!(!temp.path().join("system.json").exists());
    }
}
