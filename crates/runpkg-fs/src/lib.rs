//! Filesystem primitives for runpkg
//!
//! Provides the shared error taxonomy, atomic I/O, format-agnostic
//! document loading and saving, and resolution of the well-known
//! directories (config root, extraction root).

pub mod document;
pub mod error;
pub mod io;
pub mod locations;

pub use document::{DocumentFormat, load_document, save_document};
pub use error::{Error, ErrorKind, Result};
pub use locations::{APP_DIR_NAME, config_root, config_root_from, extraction_root};
