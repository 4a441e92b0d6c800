//! Format-agnostic document loading and saving
//!
//! Config files and manifests are structured text documents. The format is
//! chosen from the file extension so the same store can persist JSON, TOML
//! or YAML without callers caring which one is on disk.

use crate::{Error, Result, io};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Structured text formats understood by runpkg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    Toml,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    ///
    /// - `.json` -> JSON
    /// - `.toml` -> TOML
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }

    /// Parse document text in this format.
    pub fn parse<T: DeserializeOwned>(&self, content: &str, path: &Path) -> Result<T> {
        let parsed = match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::DocumentParse {
            path: path.to_path_buf(),
            format: self.label().into(),
            message,
        })
    }

    /// Render a value as document text in this format.
    pub fn render<T: Serialize>(&self, value: &T, path: &Path) -> Result<String> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        };

        rendered.map_err(|message| Error::DocumentSerialize {
            path: path.to_path_buf(),
            format: self.label().into(),
            message,
        })
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Load a document from a file, detecting the format from its extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let content = io::read_text(path)?;
    format.parse(&content, path)
}

/// Save a document to a file, detecting the format from its extension.
///
/// Uses an atomic write so a crash never leaves a truncated document.
pub fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = DocumentFormat::from_path(path)?;
    let mut content = format.render(value, path)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    io::write_atomic(path, content.as_bytes())
}
