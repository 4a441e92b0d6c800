//! Platform identifier to backend constructor table

use crate::backend::Backend;
use crate::emulator::{EmulatorBackend, PROFILES};
use crate::error::{Error, Result};
use crate::native::NativeBackend;
use crate::wine::WineBackend;
use std::collections::BTreeMap;
use std::fmt;

/// Constructor for a fresh, unconfigured backend.
pub type BackendFactory = Box<dyn Fn() -> Box<dyn Backend> + Send + Sync>;

/// Maps platform identifiers to backend constructors.
///
/// Selection is a pure lookup: an unknown platform is an error, never a
/// fallback to some other backend.
#[derive(Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in backend.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("linux", || Box::new(NativeBackend::new()));
        registry.register("windows", || Box::new(WineBackend::new()));
        for profile in PROFILES {
            registry.register(profile.platform, move || Box::new(EmulatorBackend::new(profile)));
        }
        registry
    }

    /// Register (or replace) the constructor for `platform`.
    pub fn register<F>(&mut self, platform: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Backend> + Send + Sync + 'static,
    {
        let platform = platform.into();
        if self.factories.insert(platform.clone(), Box::new(factory)).is_some() {
            tracing::debug!(platform = %platform, "Replaced backend registration");
        }
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.factories.contains_key(platform)
    }

    /// Construct the backend for `platform`.
    pub fn create(&self, platform: &str) -> Result<Box<dyn Backend>> {
        let factory = self
            .factories
            .get(platform)
            .ok_or_else(|| Error::UnsupportedPlatform {
                platform: platform.to_string(),
                available: self.platforms().into_iter().map(String::from).collect(),
            })?;
        Ok(factory())
    }

    /// Registered platform identifiers, sorted.
    pub fn platforms(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn builtins_cover_supported_platforms() {
        let registry = BackendRegistry::with_builtins();
        for platform in runpkg_config::SUPPORTED_PLATFORMS {
            assert!(registry.contains(platform), "{platform} has no backend");
        }
        assert_eq!(registry.len(), runpkg_config::SUPPORTED_PLATFORMS.len());
    }

    #[rstest]
    #[case("linux", "Native Linux")]
    #[case("windows", "Wine")]
    #[case("xbox", "Xbox (xemu)")]
    #[case("playstation5", "PlayStation 5")]
    fn create_selects_backend(#[case] platform: &str, #[case] name: &str) {
        let backend = BackendRegistry::with_builtins().create(platform).unwrap();
        assert_eq!(backend.platform(), platform);
        assert_eq!(backend.name(), name);
        assert!(!backend.is_initialized());
    }

    #[test]
    fn unknown_platform_is_policy_error() {
        let err = BackendRegistry::with_builtins().create("dreamcast").err().expect("expected error");
        match &err {
            Error::UnsupportedPlatform { platform, available } => {
                assert_eq!(platform, "dreamcast");
                assert!(available.iter().any(|p| p == "linux"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), runpkg_fs::ErrorKind::Policy);
    }

    #[test]
    fn register_adds_platform() {
        let mut registry = BackendRegistry::new();
        assert!(registry.is_empty());

        registry.register("handheld", || Box::new(NativeBackend::new()));

        assert_eq!(registry.platforms(), vec!["handheld"]);
        assert!(registry.create("handheld").is_ok());
    }

    #[test]
    fn platforms_are_sorted() {
        let registry = BackendRegistry::with_builtins();
        let platforms = registry.platforms();
        let mut sorted = platforms.clone();
        sorted.sort_unstable();
        assert_eq!(platforms, sorted);
    }
}
