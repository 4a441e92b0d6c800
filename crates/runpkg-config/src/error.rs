//! Error types for runpkg-config

use runpkg_fs::ErrorKind;
use std::path::PathBuf;

/// Result type for runpkg-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, saving or resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading, parsing or writing a config document failed
    #[error(transparent)]
    Fs(#[from] runpkg_fs::Error),

    /// A config document parsed but its top level is not a table/object
    #[error("Config document at {path} is not a key/value table")]
    NotAnObject { path: PathBuf },

    /// The config directory tree could not be created
    #[error("Failed to create configuration directory {path}: {source}")]
    ConfigDirectory {
        path: PathBuf,
        #[source]
        source: runpkg_fs::Error,
    },

    /// A platform identifier cannot be used to name a config file
    #[error("Invalid platform identifier '{id}': {reason}")]
    InvalidPlatformId { id: String, reason: String },

    /// No in-memory config exists for the platform
    #[error("No configuration loaded for platform '{platform}'")]
    PlatformNotLoaded { platform: String },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fs(inner) => inner.kind(),
            Self::NotAnObject { .. } => ErrorKind::Format,
            Self::ConfigDirectory { .. } => ErrorKind::Filesystem,
            Self::InvalidPlatformId { .. } | Self::PlatformNotLoaded { .. } => ErrorKind::Policy,
        }
    }
}
