//! Error types for runpkg-backends

use runpkg_fs::ErrorKind;
use std::path::PathBuf;

/// Result type for runpkg-backends operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting, preparing or running a backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No backend is registered for the platform
    #[error("Unsupported platform '{platform}' (available: {})", available.join(", "))]
    UnsupportedPlatform {
        platform: String,
        available: Vec<String>,
    },

    /// The external program a backend depends on could not be located
    #[error("{binary} not found: {hint}")]
    BinaryNotFound { binary: String, hint: String },

    #[error("Backend '{backend}' used before initialization")]
    NotInitialized { backend: String },

    #[error("Entry point not found: {path}")]
    EntryPointMissing { path: PathBuf },

    #[error("Failed to update permissions on {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The launch was cancelled and the child process terminated
    #[error("Launch cancelled")]
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedPlatform { .. } => ErrorKind::Policy,
            Self::EntryPointMissing { .. } | Self::Permissions { .. } => ErrorKind::Filesystem,
            Self::BinaryNotFound { .. }
            | Self::NotInitialized { .. }
            | Self::Spawn { .. }
            | Self::Wait { .. }
            | Self::Cancelled => ErrorKind::Execution,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_platform_lists_alternatives() {
        let err = Error::UnsupportedPlatform {
            platform: "dreamcast".into(),
            available: vec!["linux".into(), "windows".into()],
        };
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert_eq!(
            err.to_string(),
            "Unsupported platform 'dreamcast' (available: linux, windows)"
        );
    }
}
