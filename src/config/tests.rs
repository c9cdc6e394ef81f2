//! Tests for config functionality.

use crate::config::{Config, DEFAULT_PID_DIR};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.pid_dir, DEFAULT_PID_DIR);
    assert_eq!(config.pid_dir, "tmp/pids");
    assert!(config.app_name.is_none());
    assert!(config.record_events);
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
app_name: billing
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.app_name.as_deref(), Some("billing"));
    assert_eq!(config.pid_dir, "tmp/pids");
    assert!(config.record_events);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
pid_dir: var/run
app_name: billing
record_events: false
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.pid_dir, "var/run");
    assert_eq!(config.app_name.as_deref(), Some("billing"));
    assert!(!config.record_events);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
pid_dir: run
future_option: 7
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.pid_dir, "run");
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let err = Config::from_yaml("pid_dir: [unterminated").unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_validate_rejects_empty_pid_dir() {
    let err = Config::from_yaml("pid_dir: ''").unwrap_err();
    assert!(err.to_string().contains("pid_dir must not be empty"));
}

#[test]
fn test_validate_rejects_absolute_pid_dir() {
    let err = Config::from_yaml("pid_dir: /var/run").unwrap_err();
    assert!(err.to_string().contains("must be relative"));
}

#[test]
fn test_validate_rejects_blank_app_name() {
    let err = Config::from_yaml("app_name: '  '").unwrap_err();
    assert!(err.to_string().contains("app_name"));
}

#[test]
fn test_yaml_roundtrip_preserves_values() {
    let config = Config {
        pid_dir: "state/pids".to_string(),
        app_name: Some("ingest".to_string()),
        record_events: false,
    };
    let yaml = config.to_yaml().unwrap();
    assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_or_default(temp_dir.path().join("singleton.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("singleton.yaml");
    std::fs::write(&path, "app_name: mailer\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.app_name.as_deref(), Some("mailer"));
}

#[test]
fn test_load_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
