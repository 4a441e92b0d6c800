//! Packages for runpkg
//!
//! A package is a single `.runpkg` container holding a `manifest.json` at
//! its root and the title's files under `game/`. This crate reads
//! ([`PackageLoader`]) and writes ([`Packager`]) that layout, and keeps the
//! user's [`GameLibrary`] of known packages.

pub mod descriptor;
pub mod detect;
pub mod error;
pub mod library;
pub mod manifest;
pub mod packager;

pub use descriptor::{PACKAGE_EXTENSION, PackageDescriptor, PackageLoader, is_package_path, validate_package};
pub use detect::{Detection, detect_platform};
pub use error::{Error, Result};
pub use library::{GameLibrary, LIBRARY_FILE_NAME, LibraryEntry};
pub use manifest::{DEFAULT_VERSION, GAME_DIR, MANIFEST_FILE_NAME, Manifest};
pub use packager::Packager;
