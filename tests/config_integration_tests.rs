//! Integration tests for ConfigManager and the settings file
//!
//! These tests verify:
//! - Settings loading and saving
//! - Layering of defaults, the YAML file and environment overrides
//! - Session file placement and integration with SessionStore

use rtn_settings::state::{FileBlobStore, SessionStore};
use rtn_settings::{AppConfig, AppSettings, ConfigManager};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

fn no_environment() -> config::Map<String, String> {
    config::Map::new()
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
}

#[test]
fn test_config_dir_is_created() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("a").join("b");

    ConfigManager::new(&nested).unwrap();
    assert!(nested.exists());
}

#[test]
fn test_load_default_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    // Settings file doesn't exist, should return defaults
    let settings = manager.load_app_settings_from(no_environment()).unwrap();

    assert_eq!(settings.logging.log_dir, "logs");
    assert_eq!(settings.logging.log_prefix, "rtn-settings");
    assert!(!settings.logging.debug_mode);
    assert!(!settings.logging.console_output);
    assert_eq!(settings.session.session_file, "session.conf");
}

#[test]
fn test_partial_settings_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        manager.settings_path(),
        "logging:\n  console_output: true\nsession:\n  session_file: saved.blob\n",
    )
    .unwrap();

    let settings = manager.load_app_settings_from(no_environment()).unwrap();
    assert!(settings.logging.console_output);
    assert_eq!(settings.logging.log_dir, "logs");
    assert_eq!(settings.session.session_file, "saved.blob");
}

#[test]
fn test_malformed_settings_file_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.settings_path(), "logging: [unterminated").unwrap();

    let result = manager.load_app_settings_from(no_environment());
    assert!(result.is_err());
}

#[test]
fn test_save_and_reload_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut settings = AppSettings::default();
    settings.logging.log_dir = "custom-logs".to_string();
    settings.logging.debug_mode = true;
    manager.save_app_settings(&settings).unwrap();

    let yaml = fs::read_to_string(manager.settings_path()).unwrap();
    assert!(yaml.contains("custom-logs"));

    let reloaded = manager.load_app_settings_from(no_environment()).unwrap();
    assert_eq!(reloaded, settings);
}

#[test]
fn test_environment_takes_precedence() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut settings = AppSettings::default();
    settings.logging.debug_mode = false;
    manager.save_app_settings(&settings).unwrap();

    let mut environment = no_environment();
    environment.insert("RTN_LOGGING__DEBUG_MODE".to_string(), "true".to_string());

    let loaded = manager.load_app_settings_from(environment).unwrap();
    assert!(loaded.logging.debug_mode);
}

#[test]
fn test_session_file_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    let settings = manager.load_app_settings_from(no_environment()).unwrap();
    let session_path = manager.session_path(&settings);

    // First open bootstraps and writes the blob
    let session = SessionStore::load(FileBlobStore::new(&session_path)).unwrap();
    assert!(session_path.exists());
    assert_eq!(session.config(), AppConfig::generated());

    session.set_filters("", "CAM", "").unwrap();
    drop(session);

    // Reopening sees the edit
    let reopened = SessionStore::load(FileBlobStore::new(&session_path)).unwrap();
    assert_eq!(
        reopened.config().settings_model.exclude.patterns(),
        ["CAM"]
    );
    assert_eq!(
        fs::read_to_string(&session_path).unwrap(),
        reopened.encoded()
    );
}

#[test]
fn test_corrupt_session_file_is_regenerated() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let session_path = config_path.join("session.conf");
    fs::write(&session_path, "definitely not a blob!").unwrap();

    let session = SessionStore::load(FileBlobStore::new(&session_path)).unwrap();
    assert_eq!(session.config(), AppConfig::generated());
    assert_ne!(
        fs::read_to_string(&session_path).unwrap(),
        "definitely not a blob!"
    );
}
