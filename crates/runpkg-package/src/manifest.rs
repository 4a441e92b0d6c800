//! The package manifest
//!
//! ```json
//! {
//!   "name": "Foo",
//!   "platform": "linux",
//!   "main": "bin/foo",
//!   "version": "1.0.0",
//!   "description": "optional",
//!   "created": "2024-05-01T12:00:00+00:00",
//!   "config": { "fullscreen": false }
//! }
//! ```
//!
//! `name`, `platform` and `main` are required. `main` is relative to the
//! package's `game/` directory.

use crate::error::{Error, Result};
use runpkg_config::ConfigStore;
use serde_json::{Map, Value, json};
use std::path::{Component, Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const GAME_DIR: &str = "game";
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub platform: String,
    pub main: String,
    pub version: String,
    pub description: Option<String>,
    pub created: Option<String>,
    /// Overrides applied on top of the platform config at launch.
    pub config: ConfigStore,
}

impl Manifest {
    pub fn new(name: impl Into<String>, platform: impl Into<String>, main: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            main: main.into(),
            version: DEFAULT_VERSION.to_string(),
            description: None,
            created: None,
            config: ConfigStore::new(),
        }
    }

    /// Validate and read a manifest document.
    ///
    /// Absent or empty required strings are [`Error::MissingField`]; values
    /// of the wrong type are [`Error::InvalidField`]. The `config` object is
    /// read permissively like any other config document.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let Some(fields) = doc.as_object() else {
            return Err(Error::InvalidField {
                field: "manifest",
                reason: format!("expected an object, found {}", json_kind(doc)),
            });
        };

        let name = required_string(fields, "name")?;
        let platform = required_string(fields, "platform")?;
        let main = required_string(fields, "main")?;
        validate_entry_point(&main)?;

        let config = match fields.get("config") {
            None | Some(Value::Null) => ConfigStore::new(),
            Some(value @ Value::Object(_)) => ConfigStore::from_json(value),
            Some(other) => {
                return Err(Error::InvalidField {
                    field: "config",
                    reason: format!("expected an object, found {}", json_kind(other)),
                });
            }
        };

        Ok(Self {
            name,
            platform,
            main,
            version: optional_string(fields, "version")?.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            description: optional_string(fields, "description")?,
            created: optional_string(fields, "created")?,
            config,
        })
    }

    /// Read and validate `manifest.json`.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let doc: Value = runpkg_fs::load_document(path)?;
        if !doc.is_object() {
            return Err(Error::ManifestNotAnObject {
                path: path.to_path_buf(),
            });
        }
        Self::from_json(&doc)
    }

    pub fn to_json(&self) -> Value {
        let mut doc = json!({
            "name": self.name,
            "platform": self.platform,
            "main": self.main,
            "version": self.version,
        });
        if let Some(fields) = doc.as_object_mut() {
            if let Some(description) = &self.description {
                fields.insert("description".into(), Value::String(description.clone()));
            }
            if let Some(created) = &self.created {
                fields.insert("created".into(), Value::String(created.clone()));
            }
            fields.insert("config".into(), self.config.to_json());
        }
        doc
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        runpkg_fs::save_document(path, &self.to_json())?;
        Ok(())
    }

    /// Absolute entry point below an extracted package root.
    pub fn entry_point(&self, package_root: &Path) -> PathBuf {
        package_root.join(GAME_DIR).join(&self.main)
    }
}

/// Check that `main` stays inside `game/`.
pub(crate) fn validate_entry_point(main: &str) -> Result<()> {
    for component in Path::new(main).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::InvalidField {
                    field: "main",
                    reason: "must not contain '..'".to_string(),
                });
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidField {
                    field: "main",
                    reason: "must be relative to the game directory".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn required_string(fields: &Map<String, Value>, field: &'static str) -> Result<String> {
    match optional_string(fields, field)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingField { field }),
    }
}

fn optional_string(fields: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::InvalidField {
            field,
            reason: format!("expected a string, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_full_manifest() {
        let manifest = Manifest::from_json(&json!({
            "name": "Foo",
            "platform": "linux",
            "main": "foo.bin",
            "version": "2.1.0",
            "description": "A game",
            "created": "2024-05-01T12:00:00+00:00",
            "config": {"fullscreen": false, "nested": {"x": 1}}
        }))
        .unwrap();

        assert_eq!(manifest.name, "Foo");
        assert_eq!(manifest.version, "2.1.0");
        assert_eq!(manifest.description.as_deref(), Some("A game"));
        assert!(!manifest.config.get_bool("fullscreen", true));
        assert_eq!(manifest.config.len(), 1);
    }

    #[test]
    fn version_defaults() {
        let manifest =
            Manifest::from_json(&json!({"name": "Foo", "platform": "linux", "main": "foo"})).unwrap();
        assert_eq!(manifest.version, DEFAULT_VERSION);
        assert!(manifest.config.is_empty());
        assert_eq!(manifest.description, None);
    }

    #[rstest]
    #[case(json!({"platform": "linux", "main": "foo"}), "name")]
    #[case(json!({"name": "Foo", "main": "foo"}), "platform")]
    #[case(json!({"name": "Foo", "platform": "linux"}), "main")]
    #[case(json!({"name": "  ", "platform": "linux", "main": "foo"}), "name")]
    #[case(json!({"name": "Foo", "platform": null, "main": "foo"}), "platform")]
    fn missing_required_fields(#[case] doc: Value, #[case] expected: &str) {
        match Manifest::from_json(&doc) {
            Err(Error::MissingField { field }) => assert_eq!(field, expected),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[rstest]
    #[case(json!({"name": 7, "platform": "linux", "main": "foo"}), "name")]
    #[case(json!({"name": "Foo", "platform": "linux", "main": "foo", "config": [1]}), "config")]
    #[case(json!({"name": "Foo", "platform": "linux", "main": "../escape"}), "main")]
    #[case(json!({"name": "Foo", "platform": "linux", "main": "/bin/sh"}), "main")]
    #[case(json!({"name": "Foo", "platform": "linux", "main": "foo", "version": 1}), "version")]
    fn invalid_fields(#[case] doc: Value, #[case] expected: &str) {
        match Manifest::from_json(&doc) {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn to_json_round_trips() {
        let mut manifest = Manifest::new("Foo", "windows", "bin/foo.exe");
        manifest.description = Some("desc".into());
        manifest.config.set_int("resolution_width", 1280);

        assert_eq!(Manifest::from_json(&manifest.to_json()).unwrap(), manifest);
    }

    #[test]
    fn entry_point_is_below_game_dir() {
        let manifest = Manifest::new("Foo", "linux", "bin/foo");
        assert_eq!(
            manifest.entry_point(Path::new("/tmp/x")),
            PathBuf::from("/tmp/x/game/bin/foo")
        );
    }
}
