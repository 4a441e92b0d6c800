//! Full pipeline: pack, load, select backend, merge, launch
//!
//! These run real processes through the built-in backends.

#![cfg(unix)]

use pretty_assertions::assert_eq;
use runpkg_config::ConfigRegistry;
use runpkg_core::{EXIT_CANCELLED, Launcher, LauncherState, exit_code};
use runpkg_package::Packager;
use runpkg_test_utils::TestPackage;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn registry_in(temp: &TempDir) -> ConfigRegistry {
    let mut registry = ConfigRegistry::with_root(temp.path().join("config"));
    registry.initialize().unwrap();
    registry
        .system_config_mut()
        .set_string("temp_directory", temp.path().join("extract").to_string_lossy());
    registry
}

fn write_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_packed_native_game_runs() {
    let temp = TempDir::new().unwrap();
    let game = temp.path().join("game-src");
    write_script(&game.join("start"), "test \"$(cat data/level.txt)\" = one || exit 9\nexit 4");
    fs::create_dir_all(game.join("data")).unwrap();
    fs::write(game.join("data").join("level.txt"), "one").unwrap();

    let package = Packager::new(&game)
        .output_dir(temp.path().join("out"))
        .name("Native")
        .auto_detect(true)
        .create()
        .unwrap();

    let mut registry = registry_in(&temp);
    let mut launcher = Launcher::new(&mut registry);
    launcher.load_package(&package).unwrap();
    assert_eq!(launcher.backend().unwrap().name(), "Native Linux");

    let outcome = launcher.run();
    assert_eq!(exit_code(&outcome), 4);
    assert_eq!(launcher.state(), LauncherState::Finished);
}

#[test]
fn test_windows_package_goes_through_wine() {
    let temp = TempDir::new().unwrap();
    let record = temp.path().join("wine-args.txt");
    let wine = temp.path().join("bin").join("wine");
    write_script(
        &wine,
        &format!(
            "printf '%s\\n' \"$WINEPREFIX\" \"$@\" > '{}'\nexit 0",
            record.display()
        ),
    );

    let package = TestPackage::new("Win", "windows", "Game.exe")
        .file("Game.exe", "MZ")
        .config("fullscreen", serde_json::json!(false));
    let path = package.build();

    let mut registry = registry_in(&temp);
    {
        let windows = registry.platform_config("windows").unwrap();
        windows.set_string("wine_binary", wine.to_string_lossy());
        windows.set_string("wine_prefix", "/prefixes/win");
    }

    let mut launcher = Launcher::new(&mut registry);
    launcher.load_package(&path).unwrap();
    let entry = launcher.package().unwrap().entry_point();
    assert_eq!(launcher.run().unwrap(), 0);

    let recorded: Vec<String> = fs::read_to_string(&record)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(
        recorded,
        vec!["/prefixes/win".to_string(), entry.display().to_string()]
    );
}

#[test]
fn test_missing_wine_fails_at_run() {
    let temp = TempDir::new().unwrap();
    let package = TestPackage::new("Win", "windows", "Game.exe");
    let path = package.build();

    let mut registry = registry_in(&temp);
    registry
        .platform_config("windows")
        .unwrap()
        .set_string("wine_binary", "/nonexistent/wine");

    let mut launcher = Launcher::new(&mut registry);
    launcher.load_package(&path).unwrap();
    if runpkg_backends::BackendRegistry::with_builtins()
        .create("windows")
        .and_then(|mut backend| backend.initialize())
        .is_ok()
    {
        // Wine is installed on the test host.
        return;
    }

    let outcome = launcher.run();
    assert_eq!(exit_code(&outcome), 1);
    assert_eq!(launcher.state(), LauncherState::Failed);
}

#[test]
fn test_cancel_stops_running_game() {
    let temp = TempDir::new().unwrap();
    let package = TestPackage::linux("Sleeper").executable("run", "exec sleep 30");
    let path = package.build();

    let mut registry = registry_in(&temp);
    let mut launcher = Launcher::new(&mut registry);
    launcher.load_package(&path).unwrap();

    let token = launcher.cancel_token();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        token.cancel();
    });

    let started = Instant::now();
    let outcome = launcher.run();
    canceller.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(exit_code(&outcome), EXIT_CANCELLED);
    assert_eq!(launcher.state(), LauncherState::Failed);
}
