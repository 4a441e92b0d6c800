//! Configuration for runpkg
//!
//! Three independent stores drive a launch:
//!
//! 1. **System** - process-wide settings (temp/output directories, logging)
//! 2. **Platform** - defaults for one platform backend
//! 3. **Package** - overrides embedded in a package manifest
//!
//! Only the platform and package stores are merged per launch, with the
//! package winning. [`ConfigRegistry`] owns the first two and their files.
//!
//! # Example
//!
//! ```no_run
//! use runpkg_config::{ConfigRegistry, ConfigStore};
//!
//! let mut registry = ConfigRegistry::with_root("/tmp/runpkg-config");
//! registry.initialize()?;
//!
//! let mut package = ConfigStore::new();
//! package.set_bool("fullscreen", false);
//!
//! let merged = registry.merge_with_package_config(&package, "linux")?;
//! assert!(!merged.get_bool("fullscreen", true));
//! assert_eq!(merged.get_int("resolution_width", 0), 1920);
//! # Ok::<(), runpkg_config::Error>(())
//! ```

pub mod defaults;
pub mod error;
pub mod registry;
pub mod store;
pub mod value;

pub use defaults::{SUPPORTED_PLATFORMS, is_supported_platform, platform_defaults, system_defaults};
pub use error::{Error, Result};
pub use registry::{ConfigRegistry, PLATFORM_CONFIG_DIR, validate_platform_id};
pub use store::ConfigStore;
pub use value::{ConfigValue, ValueKind};
