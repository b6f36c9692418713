//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests cover:
//! - Missing config files SHALL NOT cause termination
//! - Priority order: CLI > environment > TOML > compiled defaults
//! - Missing or unreadable config files are logged as warnings
//! - Malformed config files are reported as configuration errors
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate KAIROS_* variables are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use kairos_common::config::{
    find_config_file, load_toml_config, resolve_service_config, CliOverrides, ServiceConfig,
    ENV_CONFIG, ENV_HOST, ENV_LOG_LEVEL, ENV_PORT,
};
use kairos_common::Error;
use serial_test::serial;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing_subscriber::fmt::MakeWriter;

/// Test helper: Clear all KAIROS_* variables and point config lookup at a
/// path that does not exist, so no real config file leaks into the test
fn isolate_env() {
    env::remove_var(ENV_HOST);
    env::remove_var(ENV_PORT);
    env::remove_var(ENV_LOG_LEVEL);
    env::set_var(ENV_CONFIG, "/nonexistent/kairos-test/config.toml");
}

fn cleanup_env() {
    env::remove_var(ENV_HOST);
    env::remove_var(ENV_PORT);
    env::remove_var(ENV_LOG_LEVEL);
    env::remove_var(ENV_CONFIG);
}

/// Test helper: Write TOML content to a temporary file
fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

/// Test helper: In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Test helper: Resolve config while recording everything it logs
fn resolve_with_logs(cli: &CliOverrides) -> (kairos_common::Result<ServiceConfig>, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, || resolve_service_config(cli));
    (result, logs.contents())
}

#[test]
fn test_compiled_defaults() {
    let defaults = ServiceConfig::default();

    assert_eq!(defaults.host, "0.0.0.0");
    assert_eq!(defaults.port, 8000);
    assert_eq!(defaults.log_level, "info");
    assert_eq!(defaults.bind_address(), "0.0.0.0:8000");
}

#[test]
#[serial]
fn test_no_overrides_uses_defaults() {
    isolate_env();

    let config = resolve_service_config(&CliOverrides::default()).unwrap();
    assert_eq!(config, ServiceConfig::default());

    cleanup_env();
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    isolate_env();
    env::set_var(ENV_HOST, "127.0.0.1");
    env::set_var(ENV_PORT, "9100");
    env::set_var(ENV_LOG_LEVEL, "debug");

    let config = resolve_service_config(&CliOverrides::default()).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9100);
    assert_eq!(config.log_level, "debug");

    cleanup_env();
}

#[test]
#[serial]
fn test_cli_takes_precedence_over_env() {
    isolate_env();
    env::set_var(ENV_PORT, "9100");
    env::set_var(ENV_HOST, "127.0.0.1");

    let cli = CliOverrides {
        port: Some(9200),
        ..Default::default()
    };
    let config = resolve_service_config(&cli).unwrap();

    assert_eq!(config.port, 9200);
    assert_eq!(config.host, "127.0.0.1");

    cleanup_env();
}

#[test]
#[serial]
fn test_invalid_env_port_is_config_error() {
    isolate_env();
    env::set_var(ENV_PORT, "eighty");

    let result = resolve_service_config(&CliOverrides::default());
    assert!(matches!(result, Err(Error::Config(_))));

    cleanup_env();
}

#[test]
#[serial]
fn test_toml_file_between_env_and_defaults() {
    isolate_env();
    let file = write_config(
        r#"
[server]
host = "10.0.0.5"
port = 8500

[logging]
level = "warn"
"#,
    );
    env::set_var(ENV_CONFIG, file.path());
    env::set_var(ENV_PORT, "8600");

    let config = resolve_service_config(&CliOverrides::default()).unwrap();
    assert_eq!(config.host, "10.0.0.5");
    assert_eq!(config.port, 8600);
    assert_eq!(config.log_level, "warn");

    cleanup_env();
}

#[test]
#[serial]
fn test_cli_config_path_beats_env_config_path() {
    isolate_env();
    let file = write_config("[server]\nport = 7001\n");

    let cli = CliOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = resolve_service_config(&cli).unwrap();
    assert_eq!(config.port, 7001);

    cleanup_env();
}

#[test]
#[serial]
fn test_missing_config_file_does_not_error() {
    isolate_env();

    let cli = CliOverrides {
        config_file: Some(PathBuf::from("/nonexistent/kairos/other.toml")),
        ..Default::default()
    };
    let result = resolve_service_config(&cli);
    assert!(result.is_ok(), "Missing config file should fall back to defaults");

    cleanup_env();
}

#[test]
#[serial]
fn test_missing_config_file_is_reported() {
    isolate_env();

    let cli = CliOverrides {
        config_file: Some(PathBuf::from("/nonexistent/kairos/typo.toml")),
        ..Default::default()
    };
    let (result, logs) = resolve_with_logs(&cli);

    assert_eq!(result.unwrap(), ServiceConfig::default());
    assert!(logs.contains("WARN"), "Expected a warning, got: {logs}");
    assert!(logs.contains("/nonexistent/kairos/typo.toml not found"));

    cleanup_env();
}

#[test]
#[serial]
fn test_unreadable_config_file_is_reported() {
    isolate_env();
    let dir = tempfile::tempdir().expect("Should create temp dir");

    let cli = CliOverrides {
        config_file: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let (result, logs) = resolve_with_logs(&cli);

    assert_eq!(result.unwrap(), ServiceConfig::default());
    assert!(logs.contains("Could not read config file"), "Got: {logs}");

    cleanup_env();
}

#[test]
#[serial]
fn test_malformed_config_file_is_error() {
    isolate_env();
    let file = write_config("[server\nport = \"not a port\"");
    env::set_var(ENV_CONFIG, file.path());

    let result = resolve_service_config(&CliOverrides::default());
    assert!(matches!(result, Err(Error::Config(_))));

    cleanup_env();
}

#[test]
fn test_partial_toml_sections() {
    let file = write_config("[logging]\nlevel = \"trace\"\n");

    let config = load_toml_config(file.path()).unwrap().unwrap();
    assert_eq!(config.logging.level.as_deref(), Some("trace"));
    assert!(config.server.host.is_none());
    assert!(config.server.port.is_none());
}

#[test]
fn test_find_explicit_config_file() {
    let file = write_config("");

    assert_eq!(find_config_file(Some(file.path())), Some(file.path().to_path_buf()));
    assert_eq!(find_config_file(Some(Path::new("/nonexistent/x.toml"))), None);
}
