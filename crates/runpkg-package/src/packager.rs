//! Creating packages from a game directory

use crate::descriptor::PACKAGE_EXTENSION;
use crate::detect::detect_platform;
use crate::error::{Error, Result};
use crate::manifest::{GAME_DIR, MANIFEST_FILE_NAME, Manifest, validate_entry_point};
use runpkg_archive::{Archiver, TarGzArchiver};
use runpkg_config::{ConfigStore, ConfigValue, is_supported_platform};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Builder that turns a game directory into `<output>/<name>.runpkg`.
///
/// Explicit `platform` and `main` always win; with auto-detection enabled
/// the missing ones are filled in from the game directory.
#[derive(Debug, Clone)]
pub struct Packager {
    game_path: PathBuf,
    output_dir: PathBuf,
    name: Option<String>,
    platform: Option<String>,
    main: Option<String>,
    description: Option<String>,
    config: ConfigStore,
    auto_detect: bool,
    archiver: Arc<dyn Archiver>,
}

impl Packager {
    pub fn new(game_path: impl Into<PathBuf>) -> Self {
        Self {
            game_path: game_path.into(),
            output_dir: PathBuf::from("."),
            name: None,
            platform: None,
            main: None,
            description: None,
            config: ConfigStore::new(),
            auto_detect: false,
            archiver: Arc::new(TarGzArchiver::new()),
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a config override embedded in the manifest.
    pub fn config_value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.set(key, value.into());
        self
    }

    pub fn auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect = enabled;
        self
    }

    pub fn archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    /// Path the package will be written to.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.name
            .as_ref()
            .map(|name| self.output_dir.join(format!("{}.{}", name, PACKAGE_EXTENSION)))
    }

    /// Validate the inputs, stage the package layout and write the container.
    pub fn create(&self) -> Result<PathBuf> {
        let manifest = self.build_manifest()?;
        let output = self.output_dir.join(format!("{}.{}", manifest.name, PACKAGE_EXTENSION));

        let staging = tempfile::Builder::new()
            .prefix("runpkg-pack-")
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;

        tracing::debug!(staging = %staging.path().display(), "Copying game files");
        copy_tree(&self.game_path, &staging.path().join(GAME_DIR))?;
        manifest.save(&staging.path().join(MANIFEST_FILE_NAME))?;

        runpkg_fs::io::ensure_dir(&self.output_dir)?;
        self.archiver.create(staging.path(), &output)?;

        tracing::info!(
            package = %output.display(),
            name = %manifest.name,
            platform = %manifest.platform,
            "Package created"
        );
        Ok(output)
    }

    fn build_manifest(&self) -> Result<Manifest> {
        if !self.game_path.is_dir() {
            return Err(Error::GamePathInvalid {
                path: self.game_path.clone(),
            });
        }

        let name = self.name.clone().unwrap_or_default();
        validate_name(&name)?;

        let (platform, main) = self.resolve_target()?;
        if !is_supported_platform(&platform) {
            return Err(Error::UnsupportedPlatform { platform });
        }

        validate_entry_point(&main).map_err(|_| Error::InvalidInput {
            field: "main",
            reason: "must be a relative path inside the game directory".to_string(),
        })?;
        let entry = self.game_path.join(&main);
        if !entry.is_file() {
            return Err(Error::InvalidInput {
                field: "main",
                reason: format!("{} does not exist", entry.display()),
            });
        }

        let mut manifest = Manifest::new(name, platform, main);
        manifest.description = self.description.clone();
        manifest.created = Some(chrono::Utc::now().to_rfc3339());
        manifest.config = self.config.clone();
        Ok(manifest)
    }

    fn resolve_target(&self) -> Result<(String, String)> {
        let explicit = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let mut platform = explicit(&self.platform);
        let mut main = explicit(&self.main);

        if self.auto_detect && (platform.is_none() || main.is_none()) {
            let detection = detect_platform(&self.game_path).ok_or_else(|| Error::DetectionFailed {
                path: self.game_path.clone(),
            })?;
            tracing::info!(platform = detection.platform, main = %detection.main, "Detected platform");
            platform.get_or_insert_with(|| detection.platform.to_string());
            main.get_or_insert(detection.main);
        }

        let required = |field: &'static str| Error::InvalidInput {
            field,
            reason: "required unless auto-detection is enabled".to_string(),
        };
        let platform = platform.ok_or_else(|| required("platform"))?;
        let main = main.ok_or_else(|| required("main"))?;
        Ok((platform, main))
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not be a relative directory name")
    } else if name.contains(FORBIDDEN_NAME_CHARS) || name.chars().any(char::is_control) {
        Some("must be usable as a file name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidInput {
            field: "name",
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            Error::io(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::io(entry.path(), std::io::Error::other(e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        } else {
            tracing::warn!(path = %entry.path().display(), "Skipping entry that is not a file or directory");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Foo")]
    #[case("Space Game 2")]
    #[case("foo-bar_baz.v2")]
    fn accepts_names(#[case] name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("a/b")]
    #[case("what?")]
    #[case("tab\there")]
    fn rejects_names(#[case] name: &str) {
        assert!(matches!(validate_name(name), Err(Error::InvalidInput { field: "name", .. })));
    }

    #[test]
    fn output_path_uses_name() {
        let packager = Packager::new("game").output_dir("out").name("Foo");
        assert_eq!(packager.output_path(), Some(PathBuf::from("out/Foo.runpkg")));
    }
}
