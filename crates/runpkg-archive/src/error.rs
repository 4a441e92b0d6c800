//! Error types for runpkg-archive

use runpkg_fs::ErrorKind;
use std::path::PathBuf;

/// Result type for runpkg-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while creating or extracting a container
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] runpkg_fs::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: PathBuf },

    #[error("Source is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    /// The container could not be decoded
    #[error("Corrupt archive {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// An entry would be written outside the destination, or is a link
    #[error("Refusing unsafe archive entry '{entry}': {reason}")]
    UnsafeEntry { entry: String, reason: String },
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
            Self::Io { .. } | Self::ArchiveNotFound { .. } | Self::SourceNotDirectory { .. } => {
                ErrorKind::Filesystem
            }
            Self::Corrupt { .. } | Self::UnsafeEntry { .. } => ErrorKind::Format,
        }
    }
}
