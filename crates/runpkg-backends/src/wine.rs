//! Windows titles through Wine

use crate::backend::Backend;
use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::locate::find_program;
use crate::process::LaunchCommand;
use runpkg_config::ConfigStore;
use runpkg_package::PackageDescriptor;
use std::path::PathBuf;

const WINE: &str = "wine";
const WINE_CANDIDATES: &[&str] = &["/usr/bin/wine", "/usr/local/bin/wine", "/opt/wine-stable/bin/wine"];
const DXVK_OVERRIDES: &str = "d3d11,d3d10,d3d9=n";

/// Runs `.exe` entry points with Wine.
///
/// Config keys:
/// - `wine_binary`: explicit path to the wine executable
/// - `wine_prefix`: exported as `WINEPREFIX` when non-empty
/// - `enable_dxvk`: prefer native Direct3D DLLs (DXVK)
/// - `fullscreen`, `resolution_width`, `resolution_height`: run inside a
///   virtual desktop of that size
#[derive(Debug, Default)]
pub struct WineBackend {
    config: ConfigStore,
    wine: Option<PathBuf>,
}

impl WineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wine_path(&self) -> Option<&std::path::Path> {
        self.wine.as_deref()
    }

    /// The command that would start `package`.
    pub fn command(&self, package: &PackageDescriptor) -> Result<LaunchCommand> {
        let wine = self.wine.as_ref().ok_or_else(|| Error::NotInitialized {
            backend: self.name().to_string(),
        })?;
        let entry = package.entry_point();
        if !entry.is_file() {
            return Err(Error::EntryPointMissing { path: entry });
        }

        let mut command = LaunchCommand::new(wine).current_dir(package.game_dir());

        let prefix = self.config.get_string("wine_prefix", "");
        if !prefix.is_empty() {
            command = command.env("WINEPREFIX", prefix);
        }
        if self.config.get_bool("enable_dxvk", true) {
            command = command.env("WINEDLLOVERRIDES", DXVK_OVERRIDES);
        }
        if self.config.get_bool("fullscreen", true) {
            let width = self.config.get_int("resolution_width", 1920);
            let height = self.config.get_int("resolution_height", 1080);
            command = command
                .arg("explorer")
                .arg(format!("/desktop=runpkg,{width}x{height}"));
        }

        Ok(command.arg(entry))
    }
}

impl Backend for WineBackend {
    fn name(&self) -> &str {
        "Wine"
    }

    fn platform(&self) -> &str {
        "windows"
    }

    fn initialize(&mut self) -> Result<()> {
        let configured = self.config.get_string("wine_binary", "");
        let wine = find_program(&configured, WINE, WINE_CANDIDATES).ok_or_else(|| Error::BinaryNotFound {
            binary: WINE.to_string(),
            hint: "install Wine or set 'wine_binary' in the windows platform config".to_string(),
        })?;
        tracing::debug!(wine = %wine.display(), "Using Wine");
        self.wine = Some(wine);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.wine.is_some()
    }

    fn apply_config(&mut self, config: &ConfigStore) {
        self.config = config.clone();
    }

    fn config(&self) -> &ConfigStore {
        &self.config
    }

    fn launch(&mut self, package: &PackageDescriptor, cancel: &CancelToken) -> Result<i32> {
        self.command(package)?.run(cancel)
    }
}
