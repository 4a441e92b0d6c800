//! Native execution of Linux titles

use crate::backend::Backend;
use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::process::LaunchCommand;
use runpkg_config::ConfigStore;
use runpkg_package::PackageDescriptor;
use std::path::Path;

/// Runs the entry point directly, with the game directory as working dir.
#[derive(Debug, Default)]
pub struct NativeBackend {
    config: ConfigStore,
    initialized: bool,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The command that would start `package`.
    pub fn command(&self, package: &PackageDescriptor) -> Result<LaunchCommand> {
        let entry = package.entry_point();
        if !entry.is_file() {
            return Err(Error::EntryPointMissing { path: entry });
        }
        Ok(LaunchCommand::new(entry).current_dir(package.game_dir()))
    }
}

impl Backend for NativeBackend {
    fn name(&self) -> &str {
        "Native Linux"
    }

    fn platform(&self) -> &str {
        "linux"
    }

    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn apply_config(&mut self, config: &ConfigStore) {
        self.config = config.clone();
    }

    fn config(&self) -> &ConfigStore {
        &self.config
    }

    fn launch(&mut self, package: &PackageDescriptor, cancel: &CancelToken) -> Result<i32> {
        if !self.initialized {
            return Err(Error::NotInitialized {
                backend: self.name().to_string(),
            });
        }
        let command = self.command(package)?;
        ensure_executable(command.program())?;
        command.run(cancel)
    }
}

#[cfg(unix)]
fn ensure_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions_error = |source| Error::Permissions {
        path: path.to_path_buf(),
        source,
    };
    let mut permissions = std::fs::metadata(path)
        .map_err(permissions_error)?
        .permissions();
    let mode = permissions.mode();
    if mode & 0o111 == 0o111 {
        return Ok(());
    }

    permissions.set_mode(mode | 0o111);
    std::fs::set_permissions(path, permissions).map_err(permissions_error)?;
    tracing::debug!(path = %path.display(), "Marked entry point executable");
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn ensure_executable_sets_bits() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("run");
        std::fs::write(&file, "").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        ensure_executable(&file).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
