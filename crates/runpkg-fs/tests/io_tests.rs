use runpkg_fs::{Error, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.json");

    io::write_atomic(&path, b"{}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_write_atomic_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("emulators").join("linux.json");

    io::write_atomic(&path, b"{}").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("linux.json");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.json");

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["system.json".to_string()]);
}

// Windows refuses to replace a file another writer is renaming over.
#[cfg(unix)]
#[test]
fn test_concurrent_writers_to_same_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("linux.json");
    let bodies: Vec<String> = (0..8).map(|i| format!("{{\"writer\": {i}}}").repeat(512)).collect();

    std::thread::scope(|scope| {
        for body in &bodies {
            let path = &path;
            scope.spawn(move || {
                for _ in 0..10 {
                    io::write_atomic(path, body.as_bytes()).unwrap();
                }
            });
        }
    });

    let written = fs::read_to_string(&path).unwrap();
    assert!(bodies.contains(&written), "file holds a mix of writers");
    let entries = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let result = io::read_text(&temp.path().join("missing.json"));

    match result {
        Err(err @ Error::Io { .. }) => assert!(err.is_not_found()),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a").join("b");

    io::ensure_dir(&dir).unwrap();
    io::ensure_dir(&dir).unwrap();

    assert!(dir.is_dir());
}
