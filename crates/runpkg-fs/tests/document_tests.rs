use pretty_assertions::assert_eq;
use runpkg_fs::{DocumentFormat, Error, load_document, save_document};
use serde_json::{Map, Value, json};
use std::fs;
use tempfile::TempDir;

fn sample() -> Map<String, Value> {
    let value = json!({
        "fullscreen": true,
        "resolution_width": 1920,
        "game_directory": "/games"
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn test_save_json_is_pretty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("linux.json");

    save_document(&path, &sample()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"fullscreen\": true"));
    assert!(content.ends_with('\n'));
}

#[test]
fn test_roundtrip_each_format() {
    let temp = TempDir::new().unwrap();

    for format in [DocumentFormat::Json, DocumentFormat::Toml, DocumentFormat::Yaml] {
        let path = temp.path().join(format!("linux.{}", format.extension()));
        save_document(&path, &sample()).unwrap();

        let loaded: Map<String, Value> = load_document(&path).unwrap();
        assert_eq!(loaded, sample(), "roundtrip through {}", format);
    }
}

#[test]
fn test_load_toml_written_by_hand() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.toml");
    fs::write(&path, "logging_level = 3\ncleanup_temp_files = false\n").unwrap();

    let loaded: Value = load_document(&path).unwrap();

    assert_eq!(loaded["logging_level"], 3);
    assert_eq!(loaded["cleanup_temp_files"], false);
}

#[test]
fn test_load_unparsable_document() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.json");
    fs::write(&path, "{ \"unterminated\": ").unwrap();

    let result: runpkg_fs::Result<Value> = load_document(&path);

    assert!(matches!(result, Err(Error::DocumentParse { .. })));
}

#[test]
fn test_save_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.ini");

    let result = save_document(&path, &sample());

    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    assert!(!path.exists());
}
