//! Tests for creating packages

use pretty_assertions::assert_eq;
use runpkg_fs::ErrorKind;
use runpkg_package::{Error, PackageLoader, Packager};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn game_dir(root: &Path) -> std::path::PathBuf {
    let game = root.join("game-src");
    fs::create_dir_all(game.join("data")).unwrap();
    fs::write(game.join("foo.bin"), "bin").unwrap();
    fs::write(game.join("data/level.dat"), "level").unwrap();
    game
}

#[test]
fn test_pack_then_load() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());

    let package = Packager::new(&game)
        .output_dir(temp.path().join("out"))
        .name("Foo")
        .platform("linux")
        .main("foo.bin")
        .description("A test title")
        .config_value("fullscreen", false)
        .config_value("resolution_width", 1280i64)
        .create()
        .expect("Should create package");

    assert_eq!(package, temp.path().join("out/Foo.runpkg"));

    let descriptor = PackageLoader::new(temp.path().join("extract"))
        .load(&package)
        .expect("Should load created package");

    assert_eq!(descriptor.name(), "Foo");
    assert_eq!(descriptor.version(), "1.0.0");
    assert_eq!(descriptor.description(), Some("A test title"));
    assert!(!descriptor.config().get_bool("fullscreen", true));
    assert_eq!(descriptor.config().get_int("resolution_width", 0), 1280);
    assert!(descriptor.manifest().created.is_some());
    assert_eq!(
        fs::read_to_string(descriptor.game_dir().join("data/level.dat")).unwrap(),
        "level"
    );
}

#[test]
fn test_created_timestamp_is_rfc3339() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());
    let package = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .platform("linux")
        .main("foo.bin")
        .create()
        .unwrap();

    let descriptor = PackageLoader::new(temp.path().join("extract")).load(&package).unwrap();
    let created = descriptor.manifest().created.clone().unwrap();

    assert!(chrono::DateTime::parse_from_rfc3339(&created).is_ok(), "{created}");
}

#[test]
fn test_unsupported_platform_is_policy_error() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());

    let err = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .platform("dreamcast")
        .main("foo.bin")
        .create()
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedPlatform { .. }));
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert!(!temp.path().join("Foo.runpkg").exists());
}

#[test]
fn test_missing_entry_point_is_rejected() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());

    let err = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .platform("linux")
        .main("missing.bin")
        .create()
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput { field: "main", .. }));
}

#[test]
fn test_missing_game_dir() {
    let temp = TempDir::new().unwrap();

    let err = Packager::new(temp.path().join("nope"))
        .name("Foo")
        .platform("linux")
        .main("foo.bin")
        .create()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Filesystem);
}

#[test]
fn test_missing_platform_without_auto_detect() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());

    let err = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .main("foo.bin")
        .create()
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput { field: "platform", .. }));
}

#[test]
fn test_auto_detect_windows() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());
    fs::create_dir_all(game.join("bin")).unwrap();
    fs::write(game.join("bin/Foo.exe"), "MZ").unwrap();

    let package = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .auto_detect(true)
        .create()
        .unwrap();

    let descriptor = PackageLoader::new(temp.path().join("extract")).load(&package).unwrap();
    assert_eq!(descriptor.platform(), "windows");
    assert_eq!(descriptor.main(), "bin/Foo.exe");
}

#[test]
fn test_explicit_values_beat_detection() {
    let temp = TempDir::new().unwrap();
    let game = game_dir(temp.path());
    fs::write(game.join("Foo.exe"), "MZ").unwrap();

    let package = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .platform("linux")
        .main("foo.bin")
        .auto_detect(true)
        .create()
        .unwrap();

    let descriptor = PackageLoader::new(temp.path().join("extract")).load(&package).unwrap();
    assert_eq!(descriptor.platform(), "linux");
    assert_eq!(descriptor.main(), "foo.bin");
}

#[test]
fn test_auto_detect_failure() {
    let temp = TempDir::new().unwrap();
    let game = temp.path().join("empty");
    fs::create_dir_all(&game).unwrap();
    fs::write(game.join("readme.txt"), "hi").unwrap();

    let err = Packager::new(&game)
        .output_dir(temp.path())
        .name("Foo")
        .auto_detect(true)
        .create()
        .unwrap_err();

    assert!(matches!(err, Error::DetectionFailed { .. }));
}
