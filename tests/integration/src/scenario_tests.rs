//! Configuration and package scenarios across the config, package and core crates

use pretty_assertions::assert_eq;
use runpkg_config::{ConfigRegistry, ConfigStore, ConfigValue};
use runpkg_core::{Error, Launcher};
use runpkg_package::{Manifest, PackageLoader};
use runpkg_test_utils::{RecordingBackend, TestPackage};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_first_use_of_linux_writes_defaults() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("App");
    let mut registry = ConfigRegistry::with_root(&root);

    registry.platform_config("linux").unwrap();

    let written = read_json(&root.join("emulators").join("linux.json"));
    assert_eq!(
        written,
        json!({
            "fullscreen": true,
            "resolution_width": 1920,
            "resolution_height": 1080,
            "game_directory": "",
        })
    );
}

#[test]
fn test_manifest_overrides_merge_over_platform_defaults() {
    let temp = TempDir::new().unwrap();
    let manifest = Manifest::from_json(&json!({
        "name": "Foo",
        "platform": "linux",
        "main": "foo.bin",
        "config": { "fullscreen": false }
    }))
    .unwrap();
    let mut registry = ConfigRegistry::with_root(temp.path());

    let merged = registry
        .merge_with_package_config(&manifest.config, &manifest.platform)
        .unwrap();

    assert!(!merged.get_bool("fullscreen", true));
    assert_eq!(merged.get_int("resolution_width", 0), 1920);
    assert_eq!(merged.get_int("resolution_height", 0), 1080);
}

#[test]
fn test_unseen_platform_file_created_once() {
    let temp = TempDir::new().unwrap();
    let mut registry = ConfigRegistry::with_root(temp.path());
    registry.initialize().unwrap();
    let path = registry.platform_config_path("handheld");
    assert!(!path.exists());

    let first = registry.platform_config("handheld").unwrap().clone();
    fs::write(&path, "{\"marker\": 1}").unwrap();
    let second = registry.platform_config("handheld").unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(read_json(&path), json!({"marker": 1}));
}

#[test]
fn test_registered_backend_supports_new_platform() {
    let temp = TempDir::new().unwrap();
    let package = TestPackage::new("Pocket", "handheld", "rom.bin").config("scale", json!(3));
    let path = package.build();
    let mut registry = ConfigRegistry::with_root(temp.path());
    registry.initialize().unwrap();
    registry
        .system_config_mut()
        .set_string("temp_directory", package.extraction_root().to_string_lossy());

    let backend = RecordingBackend::new("handheld").with_exit_code(0);
    let handle = backend.handle();
    let mut launcher = Launcher::with_backends(&mut registry, backend.into_registry());

    launcher.load_package(&path).unwrap();
    assert_eq!(launcher.run().unwrap(), 0);

    let applied = handle.last_config().unwrap();
    assert_eq!(applied.get("scale"), Some(&ConfigValue::Int(3)));
    assert!(applied.get_bool("fullscreen", false));
    drop(launcher);
    assert!(registry.platform_config_path("handheld").is_file());
}

#[test]
fn test_same_package_loads_do_not_collide() {
    let package = TestPackage::linux("Same");
    let path = package.build();
    let loader = PackageLoader::new(package.extraction_root());

    let roots: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| loader.load(&path).unwrap().extracted_root().to_path_buf()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut unique = roots.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), roots.len());
    for root in &roots {
        assert!(root.join("game").join("run").is_file());
    }
}

#[test]
fn test_failed_load_keeps_persisted_config() {
    let temp = TempDir::new().unwrap();
    let package = TestPackage::linux("Broken").remove_file("run");
    let path = package.build();
    let mut registry = ConfigRegistry::with_root(temp.path());
    registry.initialize().unwrap();
    registry
        .system_config_mut()
        .set_string("temp_directory", package.extraction_root().to_string_lossy());
    let before = ConfigStore::from_file(&registry.platform_config_path("linux")).unwrap();

    let err = Launcher::new(&mut registry).load_package(&path).unwrap_err();

    assert!(matches!(
        err,
        Error::Package(runpkg_package::Error::EntryPointNotFound { .. })
    ));
    assert_eq!(err.kind(), runpkg_fs::ErrorKind::Format);
    let after = ConfigStore::from_file(&registry.platform_config_path("linux")).unwrap();
    assert_eq!(before, after);
}
