//! Package container codec for runpkg
//!
//! The package pipeline only depends on the [`Archiver`] trait; the default
//! codec is [`TarGzArchiver`].

pub mod archiver;
pub mod error;
pub mod tar_gz;

pub use archiver::Archiver;
pub use error::{Error, Result};
pub use tar_gz::TarGzArchiver;
