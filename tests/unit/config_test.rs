//! Tests for configuration loading

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use idir::config::{AppConfig, ConfigError, ENV_DATA_DIR, ENV_PORT, ENV_TOKEN_SECRET};
use idir::core::services::ReleaseWindow;

fn env_of(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let pairs = pairs.to_vec();
    move |var| {
        pairs
            .iter()
            .find(|(k, _)| *k == var)
            .map(|(_, v)| (*v).to_string())
    }
}

#[test]
fn test_full_file_parses() {
    let config = AppConfig::from_toml(
        r#"
[server]
bind = "0.0.0.0"
port = 9000
workers = 8

[storage]
data_dir = "/srv/idir"

[rotation]
duty_size = 12
release_window = "assignment"

[auth]
token_ttl_hours = 2

[settings]
cache_ttl_secs = 60
"#,
    )
    .unwrap();

    assert_eq!(config.listen_addr(), "0.0.0.0:9000");
    assert_eq!(config.server.workers, 8);
    assert_eq!(config.storage.data_dir, PathBuf::from("/srv/idir"));
    let policy = config.rotation_policy();
    assert_eq!(policy.duty_size, 12);
    assert_eq!(policy.release_window, ReleaseWindow::Assignment);
    assert_eq!(config.token_ttl(), chrono::Duration::hours(2));
    assert_eq!(config.settings_cache_ttl(), std::time::Duration::from_secs(60));
}

#[test]
fn test_unknown_release_window_is_rejected() {
    assert!(AppConfig::from_toml("[rotation]\nrelease_window = \"everyone\"\n").is_err());
}

#[test]
fn test_environment_overrides_file() {
    let mut config = AppConfig::from_toml("[server]\nport = 9000\n").unwrap();
    config
        .apply_env(env_of(&[
            (ENV_PORT, "7070"),
            (ENV_DATA_DIR, "/tmp/idir-data"),
            (ENV_TOKEN_SECRET, "s3cret"),
        ]))
        .unwrap();
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/idir-data"));
    assert_eq!(config.token_secret().unwrap(), "s3cret");
}

#[test]
fn test_bad_port_in_environment() {
    let mut config = AppConfig::default();
    let err = config.apply_env(env_of(&[(ENV_PORT, "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::Env { .. }));
}

#[test]
fn test_secret_is_required_only_when_asked_for() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert!(matches!(config.token_secret(), Err(ConfigError::MissingSecret)));
}

#[test]
fn test_zero_duty_size_is_invalid() {
    let config = AppConfig::from_toml("[rotation]\nduty_size = 0\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
#[serial]
fn test_load_reads_explicit_file_and_environment() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("idir.toml");
    fs::write(&path, "[server]\nport = 9100\n").unwrap();

    // SAFETY: serialized with every other test that touches the environment
    unsafe { std::env::set_var(ENV_TOKEN_SECRET, "from-env") };
    let loaded = AppConfig::load(Some(&path));
    unsafe { std::env::remove_var(ENV_TOKEN_SECRET) };

    let config = loaded.unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.token_secret().unwrap(), "from-env");
}

#[test]
#[serial]
fn test_load_reports_missing_explicit_file() {
    let temp = TempDir::new().unwrap();
    let err = AppConfig::load(Some(&temp.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
