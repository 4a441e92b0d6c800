//! The launch pipeline
//!
//! [`Launcher`] composes the config registry, the package loader and the
//! backend registry: load a package, select its backend, merge config,
//! apply it, then run.

use crate::error::{Error, Result};
use runpkg_backends::{Backend, BackendRegistry, CancelToken};
use runpkg_config::{ConfigRegistry, ConfigStore};
use runpkg_package::{PackageDescriptor, PackageLoader};
use std::fmt;
use std::path::Path;

/// Exit code for a launch stopped through the cancel token.
pub const EXIT_CANCELLED: i32 = 130;

/// Exit code for any failure before or around the backend's own process.
pub const EXIT_FAILURE: i32 = 1;

/// Where the launcher is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherState {
    Idle,
    PackageLoaded,
    BackendSelected,
    ConfigApplied,
    Running,
    Finished,
    Failed,
}

impl LauncherState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PackageLoaded => "package-loaded",
            Self::BackendSelected => "backend-selected",
            Self::ConfigApplied => "config-applied",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LauncherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package ready to run: its backend already holds `config`.
struct Prepared {
    package: PackageDescriptor,
    backend: Box<dyn Backend>,
    config: ConfigStore,
}

/// Loads packages and runs them on the backend for their platform.
///
/// The launcher borrows the process's [`ConfigRegistry`] for its lifetime.
/// A load either completes (package extracted, backend selected and
/// configured) or leaves nothing loaded.
pub struct Launcher<'a> {
    registry: &'a mut ConfigRegistry,
    backends: BackendRegistry,
    state: LauncherState,
    prepared: Option<Prepared>,
    cancel: CancelToken,
}

impl<'a> Launcher<'a> {
    /// A launcher with every built-in backend.
    pub fn new(registry: &'a mut ConfigRegistry) -> Self {
        Self::with_backends(registry, BackendRegistry::with_builtins())
    }

    pub fn with_backends(registry: &'a mut ConfigRegistry, backends: BackendRegistry) -> Self {
        Self {
            registry,
            backends,
            state: LauncherState::Idle,
            prepared: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn state(&self) -> LauncherState {
        self.state
    }

    /// Token that stops a running launch from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn config_registry(&self) -> &ConfigRegistry {
        self.registry
    }

    /// The loaded package, if the last load succeeded.
    pub fn package(&self) -> Option<&PackageDescriptor> {
        self.prepared.as_ref().map(|p| &p.package)
    }

    /// The merged config applied to the backend, if a package is loaded.
    pub fn effective_config(&self) -> Option<&ConfigStore> {
        self.prepared.as_ref().map(|p| &p.config)
    }

    /// The selected backend, if a package is loaded.
    pub fn backend(&self) -> Option<&dyn Backend> {
        self.prepared.as_ref().map(|p| p.backend.as_ref())
    }

    /// Load `package_path` and prepare its backend.
    ///
    /// Initializes the config registry if needed, extracts and validates the
    /// package, selects the backend for its platform, merges the platform
    /// config with the package's overrides and applies the result. A
    /// previously loaded package is unloaded first.
    ///
    /// # Errors
    ///
    /// Any failing stage aborts the load, leaves the launcher `Failed` with
    /// nothing loaded and removes the extraction directory if one was made.
    pub fn load_package(&mut self, package_path: &Path) -> Result<&PackageDescriptor> {
        self.unload();
        self.cancel.reset();

        match self.prepare(package_path) {
            Ok(prepared) => {
                self.state = LauncherState::ConfigApplied;
                tracing::info!(
                    name = prepared.package.name(),
                    platform = prepared.package.platform(),
                    backend = prepared.backend.name(),
                    "Package ready"
                );
                Ok(&self.prepared.insert(prepared).package)
            }
            Err(e) => {
                self.state = LauncherState::Failed;
                tracing::debug!(path = %package_path.display(), error = %e, "Package load failed");
                Err(e)
            }
        }
    }

    fn prepare(&mut self, package_path: &Path) -> Result<Prepared> {
        self.registry.initialize()?;

        let loader = PackageLoader::new(self.registry.extraction_root());
        let package = loader.load(package_path)?;
        self.state = LauncherState::PackageLoaded;

        match self.select_and_configure(&package) {
            Ok((backend, config)) => Ok(Prepared {
                package,
                backend,
                config,
            }),
            Err(e) => {
                discard_extracted(&package);
                Err(e)
            }
        }
    }

    fn select_and_configure(&mut self, package: &PackageDescriptor) -> Result<(Box<dyn Backend>, ConfigStore)> {
        let mut backend = self.backends.create(package.platform())?;
        self.state = LauncherState::BackendSelected;
        tracing::debug!(platform = package.platform(), backend = backend.name(), "Backend selected");

        let config = self
            .registry
            .merge_with_package_config(package.config(), package.platform())?;
        backend.apply_config(&config);
        Ok((backend, config))
    }

    /// Run the loaded package and return the backend's exit code verbatim.
    ///
    /// The backend is initialized first if it has not been yet. The call
    /// blocks until the launched process exits or the cancel token fires.
    ///
    /// # Errors
    ///
    /// [`Error::NoPackageLoaded`] without a successful prior load; nothing
    /// is started in that case and the state is unchanged.
    pub fn run(&mut self) -> Result<i32> {
        let Some(prepared) = self.prepared.as_mut() else {
            return Err(Error::NoPackageLoaded);
        };

        self.state = LauncherState::Running;
        let outcome = launch(prepared, &self.cancel);
        match &outcome {
            Ok(code) => {
                self.state = LauncherState::Finished;
                tracing::info!(code, name = prepared.package.name(), "Package exited");
            }
            Err(e) => {
                self.state = LauncherState::Failed;
                if e.is_cancelled() {
                    tracing::info!(name = prepared.package.name(), "Launch cancelled");
                } else {
                    tracing::warn!(name = prepared.package.name(), error = %e, "Launch failed");
                }
            }
        }
        outcome
    }

    /// Drop the loaded package.
    ///
    /// Its extraction directory is removed when the system config's
    /// `cleanup_temp_files` is set.
    pub fn unload(&mut self) {
        let Some(prepared) = self.prepared.take() else {
            return;
        };
        self.state = LauncherState::Idle;
        if self.registry.system_config().get_bool("cleanup_temp_files", true) {
            discard_extracted(&prepared.package);
        }
    }
}

impl Drop for Launcher<'_> {
    fn drop(&mut self) {
        self.unload();
    }
}

impl fmt::Debug for Launcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("state", &self.state)
            .field("package", &self.package().map(|p| p.name()))
            .field("backends", &self.backends)
            .finish()
    }
}

fn launch(prepared: &mut Prepared, cancel: &CancelToken) -> Result<i32> {
    if !prepared.backend.is_initialized() {
        prepared.backend.initialize()?;
    }
    tracing::debug!(
        name = prepared.package.name(),
        backend = prepared.backend.name(),
        entry = %prepared.package.entry_point().display(),
        "Handing package to backend"
    );
    Ok(prepared.backend.launch(&prepared.package, cancel)?)
}

fn discard_extracted(package: &PackageDescriptor) {
    if let Err(e) = package.remove_extracted() {
        tracing::warn!(
            path = %package.extracted_root().display(),
            error = %e,
            "Failed to remove extracted package"
        );
    }
}

/// Process exit code for the outcome of [`Launcher::run`].
///
/// The backend's code is returned unchanged; cancellation maps to
/// [`EXIT_CANCELLED`] and every other failure to [`EXIT_FAILURE`].
pub fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(e) if e.is_cancelled() => EXIT_CANCELLED,
        Err(_) => EXIT_FAILURE,
    }
}
