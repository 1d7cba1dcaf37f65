use reqconv::config::{ConfigLoader, OutputFormat, Settings};
use std::fs;

#[test]
fn test_load_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reqconv.toml");
    fs::write(&path, "output = \"http\"\npretty = false\n").unwrap();

    let settings = ConfigLoader::load_from_path(&path).unwrap();
    assert_eq!(settings.output, OutputFormat::Http);
    assert!(!settings.pretty);
    assert!(settings.color);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ConfigLoader::load_from_path(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.output, OutputFormat::Json);
    assert!(settings.color);
    assert!(settings.pretty);
}
