//! Error types for runpkg-cli

use runpkg_fs::ErrorKind;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from runpkg-core
    #[error(transparent)]
    Core(#[from] runpkg_core::Error),

    /// Error from runpkg-config
    #[error(transparent)]
    Config(#[from] runpkg_config::Error),

    /// Error from runpkg-package
    #[error(transparent)]
    Package(#[from] runpkg_package::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Category of the underlying library error, if there is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Core(e) => Some(e.kind()),
            Self::Config(e) => Some(e.kind()),
            Self::Package(e) => Some(e.kind()),
            Self::Json(_) | Self::User { .. } => None,
        }
    }

    /// What the user can do about it.
    pub fn hint(&self) -> Option<&'static str> {
        self.kind().map(|kind| match kind {
            ErrorKind::Filesystem => "check that the path exists and is readable and writable",
            ErrorKind::Format => "the file is malformed; fix or regenerate it",
            ErrorKind::Policy => "the request was refused; see `runpkg platforms` and `runpkg --help`",
            ErrorKind::Execution => "the game or its emulator could not be run; check the backend settings",
        })
    }
}
