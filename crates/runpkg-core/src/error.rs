//! Error types for runpkg-core

use runpkg_fs::ErrorKind;

/// Result type for runpkg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or running a package
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `run` was called without a successfully loaded package
    #[error("No package loaded")]
    NoPackageLoaded,

    /// The launch was cancelled through the launcher's token
    #[error("Launch cancelled")]
    Cancelled,

    // Transparent wrappers for underlying crate errors
    /// Configuration error from runpkg-config
    #[error(transparent)]
    Config(#[from] runpkg_config::Error),

    /// Package error from runpkg-package
    #[error(transparent)]
    Package(#[from] runpkg_package::Error),

    /// Backend error from runpkg-backends
    #[error(transparent)]
    Backend(runpkg_backends::Error),
}

impl From<runpkg_backends::Error> for Error {
    fn from(err: runpkg_backends::Error) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Backend(err)
        }
    }
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPackageLoaded => ErrorKind::Policy,
            Self::Cancelled => ErrorKind::Execution,
            Self::Config(inner) => inner.kind(),
            Self::Package(inner) => inner.kind(),
            Self::Backend(inner) => inner.kind(),
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
    fn backend_cancellation_is_lifted() {
        let err = Error::from(runpkg_backends::Error::Cancelled);
        assert!(err.is_cancelled());
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn kinds_pass_through() {
        let err = Error::from(runpkg_backends::Error::UnsupportedPlatform {
            platform: "dreamcast".into(),
            available: vec![],
        });
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert_eq!(Error::NoPackageLoaded.kind(), ErrorKind::Policy);
    }
}
