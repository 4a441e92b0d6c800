//! Error types for runpkg-fs

use std::path::PathBuf;

/// Result type for runpkg-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, shared by every runpkg crate.
///
/// Callers use this to pick a remediation: filesystem problems are about
/// paths and permissions, format problems mean a file has to be fixed,
/// policy problems mean the request itself is not allowed (for example a
/// platform without a backend), and execution problems come from starting
/// or supervising an external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Filesystem,
    Format,
    Policy,
    Execution,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Filesystem => "filesystem",
            Self::Format => "format",
            Self::Policy => "policy",
            Self::Execution => "execution",
        };
        f.write_str(label)
    }
}

/// Errors that can occur in runpkg-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document at {path}: {message}")]
    DocumentParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} document for {path}: {message}")]
    DocumentSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported document format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::LockFailed { .. } => ErrorKind::Filesystem,
            Self::DocumentParse { .. }
            | Self::DocumentSerialize { .. }
            | Self::UnsupportedFormat { .. } => ErrorKind::Format,
        }
    }

    /// Whether this error means the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
