//! [`RecordingBackend`]: a backend that records calls instead of starting
//! processes.

use runpkg_backends::{Backend, BackendRegistry, CancelToken, Error, Result};
use runpkg_config::ConfigStore;
use runpkg_package::PackageDescriptor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Everything a [`RecordingBackend`] observed.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    /// Every config passed to `apply_config`, in order.
    pub applied_configs: Vec<ConfigStore>,
    pub initialize_calls: usize,
    /// Entry points of launched packages, in order.
    pub launches: Vec<PathBuf>,
}

/// Shared view of the recording, valid after the backend has been moved
/// into a launcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandle(Arc<Mutex<Recording>>);

impl RecordingHandle {
    pub fn snapshot(&self) -> Recording {
        self.0.lock().unwrap().clone()
    }

    pub fn last_config(&self) -> Option<ConfigStore> {
        self.0.lock().unwrap().applied_configs.last().cloned()
    }

    pub fn launch_count(&self) -> usize {
        self.0.lock().unwrap().launches.len()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Recording) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }
}

/// A scripted backend for launcher tests.
///
/// # Example
///
/// ```rust,no_run
/// use runpkg_test_utils::RecordingBackend;
///
/// let backend = RecordingBackend::new("linux").with_exit_code(7);
/// let handle = backend.handle();
/// let registry = backend.into_registry();
/// assert!(registry.contains("linux"));
/// assert_eq!(handle.launch_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    platform: String,
    exit_code: i32,
    fail_initialize: bool,
    config: ConfigStore,
    initialized: bool,
    handle: RecordingHandle,
}

impl RecordingBackend {
    pub fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            exit_code: 0,
            fail_initialize: false,
            config: ConfigStore::new(),
            initialized: false,
            handle: RecordingHandle::default(),
        }
    }

    /// Exit code every launch returns.
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Make `initialize` fail as if the backend's program were missing.
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    pub fn handle(&self) -> RecordingHandle {
        self.handle.clone()
    }

    /// Register this backend under its platform in `registry`.
    ///
    /// Every constructed instance shares this backend's recording.
    pub fn register(self, registry: &mut BackendRegistry) {
        let platform = self.platform.clone();
        registry.register(platform, move || Box::new(self.clone()) as Box<dyn Backend>);
    }

    /// A registry holding only this backend.
    pub fn into_registry(self) -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        self.register(&mut registry);
        registry
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "Recording"
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn initialize(&mut self) -> Result<()> {
        self.handle.with(|r| r.initialize_calls += 1);
        if self.fail_initialize {
            return Err(Error::BinaryNotFound {
                binary: "recording".to_string(),
                hint: "scripted failure".to_string(),
            });
        }
        self.initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn apply_config(&mut self, config: &ConfigStore) {
        self.config = config.clone();
        self.handle.with(|r| r.applied_configs.push(config.clone()));
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
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.handle.with(|r| r.launches.push(package.entry_point()));
        Ok(self.exit_code)
    }
}
