//! The capability contract every platform backend satisfies

use crate::cancel::CancelToken;
use crate::error::Result;
use runpkg_config::ConfigStore;
use runpkg_package::PackageDescriptor;

/// Starts packages for one platform.
///
/// The launcher drives a backend in a fixed order: `apply_config` with the
/// merged platform and package config, `initialize`, then `launch`.
/// `launch` blocks until the started process exits and returns its exit
/// code unchanged.
pub trait Backend: Send {
    /// Display name, e.g. "Wine".
    fn name(&self) -> &str;

    /// Platform identifier this backend serves.
    fn platform(&self) -> &str;

    /// Locate external programs and validate the applied config.
    fn initialize(&mut self) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Replace the backend's effective config.
    fn apply_config(&mut self, config: &ConfigStore);

    /// The config currently applied.
    fn config(&self) -> &ConfigStore;

    /// Defaults this backend expects when nothing else is configured.
    fn default_config(&self) -> ConfigStore {
        runpkg_config::platform_defaults(self.platform())
    }

    /// Run `package`, blocking until it exits or `cancel` fires.
    fn launch(&mut self, package: &PackageDescriptor, cancel: &CancelToken) -> Result<i32>;
}
