//! [`TestPackage`] builder for package-pipeline test scenarios.
//!
//! Unlike [`runpkg_package::Packager`], the builder writes whatever manifest
//! it is told to, so tests can produce packages that are deliberately broken.

use runpkg_archive::{Archiver, TarGzArchiver};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A package under construction inside its own temporary directory.
///
/// # Example
///
/// ```rust,no_run
/// use runpkg_test_utils::TestPackage;
/// use serde_json::json;
///
/// let package = TestPackage::linux("Foo").config("fullscreen", json!(false));
/// let path = package.build();
/// assert!(path.ends_with("Foo.runpkg"));
/// ```
pub struct TestPackage {
    temp_dir: TempDir,
    file_name: String,
    manifest: Map<String, Value>,
    config: Map<String, Value>,
    files: Vec<(String, Vec<u8>, bool)>,
}

impl TestPackage {
    /// A package with the three required manifest fields and an empty
    /// entry point file.
    pub fn new(name: &str, platform: &str, main: &str) -> Self {
        let mut manifest = Map::new();
        manifest.insert("name".into(), Value::from(name));
        manifest.insert("platform".into(), Value::from(platform));
        manifest.insert("main".into(), Value::from(main));

        Self {
            temp_dir: TempDir::new().unwrap(),
            file_name: format!("{name}.runpkg"),
            manifest,
            config: Map::new(),
            files: vec![(main.to_string(), Vec::new(), false)],
        }
    }

    /// A linux package whose entry point `run` is a shell script exiting 0.
    pub fn linux(name: &str) -> Self {
        Self::new(name, "linux", "run").executable("run", "exit 0")
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Name of the written package file, `<name>.runpkg` by default.
    pub fn file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    /// Set (or replace) a top-level manifest field.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.manifest.insert(key.to_string(), value);
        self
    }

    /// Remove a top-level manifest field.
    pub fn without(mut self, key: &str) -> Self {
        self.manifest.remove(key);
        self
    }

    /// Add a key to the embedded `config` object.
    pub fn config(mut self, key: &str, value: Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    /// Add (or replace) a file under `game/`.
    pub fn file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.retain(|(existing, _, _)| existing != path);
        self.files.push((path.to_string(), contents.into(), false));
        self
    }

    /// Add (or replace) an executable shell script under `game/`.
    pub fn executable(mut self, path: &str, body: &str) -> Self {
        self.files.retain(|(existing, _, _)| existing != path);
        self.files
            .push((path.to_string(), format!("#!/bin/sh\n{body}\n").into_bytes(), true));
        self
    }

    /// Drop a file from `game/`, e.g. the entry point.
    pub fn remove_file(mut self, path: &str) -> Self {
        self.files.retain(|(existing, _, _)| existing != path);
        self
    }

    /// The manifest document as it will be written.
    pub fn manifest(&self) -> Value {
        let mut manifest = self.manifest.clone();
        if !self.config.is_empty() {
            manifest.insert("config".into(), Value::Object(self.config.clone()));
        }
        Value::Object(manifest)
    }

    /// Stage and archive the package, returning the `.runpkg` path.
    ///
    /// # Panics
    /// Panics if staging or archiving fails.
    pub fn build(&self) -> PathBuf {
        let stage = tempfile::tempdir_in(self.root()).unwrap();
        let game = stage.path().join("game");
        fs::create_dir_all(&game).unwrap();

        for (path, contents, executable) in &self.files {
            let target = game.join(path);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(&target, contents).unwrap();
            if *executable {
                make_executable(&target);
            }
        }

        let manifest = serde_json::to_string_pretty(&self.manifest()).unwrap();
        fs::write(stage.path().join("manifest.json"), manifest).unwrap();

        let output = self.root().join("packages").join(&self.file_name);
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        TarGzArchiver::new()
            .create(stage.path(), &output)
            .unwrap_or_else(|e| panic!("TestPackage::build: failed to archive: {e}"));
        output
    }

    /// A directory for extracted packages, inside the temporary directory.
    pub fn extraction_root(&self) -> PathBuf {
        self.root().join("extract")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
