use access_ledger::{load_node_config, AccessLedgerError, AccessNode};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = load_node_config(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(config.storage_path, PathBuf::from("data"));
    assert_eq!(config.recognizer.timeout_seconds, 30);
}

#[test]
fn test_toml_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.toml");
    fs::write(
        &path,
        r#"
storage_path = "/srv/ledger"
bind_address = "0.0.0.0:8443"
cors_allowed_origins = ["https://gate.example.com"]

[recognizer]
base_url = "http://recognizer.internal:5000"
timeout_seconds = 10

[log]
default_level = "DEBUG"
"#,
    )
    .unwrap();

    let config = load_node_config(Some(path.as_path())).unwrap();
    assert_eq!(config.storage_path, PathBuf::from("/srv/ledger"));
    assert_eq!(config.bind_address, "0.0.0.0:8443");
    assert_eq!(config.cors_allowed_origins.len(), 1);
    assert_eq!(config.recognizer.base_url, "http://recognizer.internal:5000");
    assert_eq!(config.log.default_level, "DEBUG");
}

#[test]
fn test_json_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    fs::write(&path, r#"{"recognizer": {"timeout_seconds": 45}}"#).unwrap();

    let config = load_node_config(Some(path.as_path())).unwrap();
    assert_eq!(config.recognizer.timeout_seconds, 45);
    assert_eq!(config.recognizer.base_url, "http://127.0.0.1:5000");
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.toml");
    fs::write(&path, "[recognizer]\ntimeout_seconds = 0\n").unwrap();
    assert!(matches!(
        load_node_config(Some(path.as_path())),
        Err(AccessLedgerError::Config(_))
    ));

    fs::write(&path, "storage_path = [").unwrap();
    assert!(matches!(
        load_node_config(Some(path.as_path())),
        Err(AccessLedgerError::Config(_))
    ));
}

#[test]
fn test_node_opens_configured_storage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.toml");
    let storage = dir.path().join("db");
    fs::write(
        &path,
        format!("storage_path = {:?}\n", storage.to_string_lossy()),
    )
    .unwrap();

    let config = load_node_config(Some(path.as_path())).unwrap();
    let node = AccessNode::new(&config).unwrap();
    assert!(node.list_areas().unwrap().is_empty());
    node.close();
    assert!(storage.exists());
}
