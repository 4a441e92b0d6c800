//! Error types for runpkg-package

use runpkg_fs::ErrorKind;
use std::path::PathBuf;

/// Result type for runpkg-package operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or creating a package
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] runpkg_fs::Error),

    #[error(transparent)]
    Archive(#[from] runpkg_archive::Error),

    #[error(transparent)]
    Config(#[from] runpkg_config::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package file does not exist: {path}")]
    PackageNotFound { path: PathBuf },

    #[error("Not a .{expected} package: {path}")]
    WrongExtension { path: PathBuf, expected: String },

    #[error("Manifest not found in package: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Manifest is not a JSON object: {path}")]
    ManifestNotAnObject { path: PathBuf },

    /// A required manifest field is absent or empty
    #[error("Manifest is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A manifest field is present but has the wrong shape
    #[error("Manifest field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Entry point not found in package: {path}")]
    EntryPointNotFound { path: PathBuf },

    #[error("Game path does not exist or is not a directory: {path}")]
    GamePathInvalid { path: PathBuf },

    /// A packaging input is missing or unusable
    #[error("Invalid packaging input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unsupported platform '{platform}'")]
    UnsupportedPlatform { platform: String },

    #[error("Could not detect a platform from the files in {path}")]
    DetectionFailed { path: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fs(inner) => inner.kind(),
            Self::Archive(inner) => inner.kind(),
            Self::Config(inner) => inner.kind(),
            Self::Io { .. } | Self::PackageNotFound { .. } | Self::GamePathInvalid { .. } => {
                ErrorKind::Filesystem
            }
            Self::WrongExtension { .. }
            | Self::ManifestNotFound { .. }
            | Self::ManifestNotAnObject { .. }
            | Self::InvalidField { .. }
            | Self::EntryPointNotFound { .. } => ErrorKind::Format,
            Self::MissingField { .. }
            | Self::InvalidInput { .. }
            | Self::UnsupportedPlatform { .. }
            | Self::DetectionFailed { .. } => ErrorKind::Policy,
        }
    }
}
