//! Configuration loading and service settings resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable config file is not fatal; the service starts
//! with defaults. A config file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_HOST: &str = "KAIROS_HOST";
pub const ENV_PORT: &str = "KAIROS_PORT";
pub const ENV_CONFIG: &str = "KAIROS_CONFIG";
pub const ENV_LOG_LEVEL: &str = "KAIROS_LOG_LEVEL";

/// Contents of `config.toml`
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8000
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve service settings from CLI, environment, config file and defaults
pub fn resolve_service_config(cli: &CliOverrides) -> Result<ServiceConfig> {
    let explicit = cli
        .config_file
        .clone()
        .or_else(|| std::env::var(ENV_CONFIG).ok().map(PathBuf::from));

    let toml_config = match find_config_file(explicit.as_deref()) {
        Some(path) => load_toml_config(&path)?.unwrap_or_default(),
        None => TomlConfig::default(),
    };

    let env_port = match std::env::var(ENV_PORT) {
        Ok(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
            Error::Config(format!("{} is not a valid port: {:?}", ENV_PORT, raw))
        })?),
        Err(_) => None,
    };

    let defaults = ServiceConfig::default();
    Ok(ServiceConfig {
        host: cli
            .host
            .clone()
            .or_else(|| std::env::var(ENV_HOST).ok())
            .or(toml_config.server.host)
            .unwrap_or(defaults.host),
        port: cli
            .port
            .or(env_port)
            .or(toml_config.server.port)
            .unwrap_or(defaults.port),
        log_level: cli
            .log_level
            .clone()
            .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
            .or(toml_config.logging.level)
            .unwrap_or(defaults.log_level),
    })
}

/// Locate the config file.
///
/// An explicit path is used as given (if it exists). Otherwise the user
/// config directory is searched, then `/etc/kairos/config.toml` on Linux.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!("Config file {} not found, using defaults", path.display());
        return None;
    }

    let user_config = dirs::config_dir().map(|d| d.join("kairos").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/kairos/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load a TOML config file.
///
/// Returns `Ok(None)` when the file cannot be read and
/// `Err(Error::Config)` when it is read but malformed.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read config file {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded config file {}", path.display());
    Ok(Some(config))
}
