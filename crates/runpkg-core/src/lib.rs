//! Launch pipeline for runpkg
//!
//! Ties the lower crates together:
//!
//! ```text
//!                  runpkg-cli
//!                      |
//!                 runpkg-core
//!                      |
//!      +-------------+-+-----------+
//!      |             |             |
//! runpkg-config runpkg-package runpkg-backends
//! ```
//!
//! # Example
//!
//! ```no_run
//! use runpkg_config::ConfigRegistry;
//! use runpkg_core::{Launcher, exit_code};
//! use std::path::Path;
//!
//! let mut registry = ConfigRegistry::new();
//! let mut launcher = Launcher::new(&mut registry);
//! let outcome = launcher
//!     .load_package(Path::new("Foo.runpkg"))
//!     .map(|_| ())
//!     .and_then(|()| launcher.run());
//! std::process::exit(exit_code(&outcome));
//! ```

pub mod error;
pub mod launcher;

pub use error::{Error, Result};
pub use launcher::{EXIT_CANCELLED, EXIT_FAILURE, Launcher, LauncherState, exit_code};
