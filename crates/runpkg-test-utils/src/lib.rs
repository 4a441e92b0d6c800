//! Shared test utilities for the runpkg workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`package`]: [`TestPackage`] builder for real `.runpkg` files
//! - [`backend`]: [`RecordingBackend`] that records instead of launching

pub mod backend;
pub mod package;

pub use backend::{Recording, RecordingBackend, RecordingHandle};
pub use package::TestPackage;
