//! Service configuration
//!
//! Config is read from `--config <path>`, else `./idir.toml`, else
//! `~/.config/idir/config.toml` (XDG standard). Every field has a default,
//! so an empty or missing file is valid apart from the token secret, which
//! may come from the environment instead.
//!
//! Environment overrides: `IDIR_DATA_DIR`, `IDIR_PORT`, `IDIR_TOKEN_SECRET`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::services::{ReleaseWindow, RotationPolicy};
use crate::paths;

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "IDIR_DATA_DIR";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "IDIR_PORT";
/// Environment variable supplying the token secret
pub const ENV_TOKEN_SECRET: &str = "IDIR_TOKEN_SECRET";

/// Configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// Environment override has an unusable value
    #[error("invalid value for {var}: {value:?}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// Out-of-range setting
    #[error("invalid config: {0}")]
    Invalid(String),

    /// No token secret configured
    #[error("no token secret configured (set [auth] token_secret or {ENV_TOKEN_SECRET})")]
    MissingSecret,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Funeral duty rotation
    #[serde(default)]
    pub rotation: RotationConfig,
    /// Bearer tokens
    #[serde(default)]
    pub auth: AuthConfig,
    /// Settings registry
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    4
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

/// Store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory
    #[serde(default = "paths::default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: paths::default_data_dir(),
        }
    }
}

/// Rotation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Slots per duty list
    #[serde(default = "default_duty_size")]
    pub duty_size: usize,
    /// Reach of the released list
    #[serde(default)]
    pub release_window: ReleaseWindow,
}

fn default_duty_size() -> usize {
    15
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            duty_size: default_duty_size(),
            release_window: ReleaseWindow::default(),
        }
    }
}

/// Token settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret; prefer the environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
}

fn default_token_ttl_hours() -> u32 {
    12
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Settings registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    crate::cache::DEFAULT_TTL.as_secs()
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Find the config file to use, if any
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        [PathBuf::from(paths::LOCAL_CONFIG), paths::global_config()]
            .into_iter()
            .find(|p| p.exists())
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from disk and the process environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            },
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(secret) = lookup(ENV_TOKEN_SECRET).filter(|v| !v.is_empty()) {
            self.auth.token_secret = Some(secret);
        }
        Ok(())
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation.duty_size == 0 {
            return Err(ConfigError::Invalid("rotation.duty_size must be at least 1".into()));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::Invalid("server.workers must be at least 1".into()));
        }
        if self.auth.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_hours must be at least 1".into()));
        }
        Ok(())
    }

    /// The token secret, required by anything that signs or verifies tokens
    pub fn token_secret(&self) -> Result<&str, ConfigError> {
        self.auth
            .token_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)
    }

    /// Token lifetime
    #[must_use]
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.auth.token_ttl_hours))
    }

    /// Settings cache lifetime
    #[must_use]
    pub fn settings_cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.settings.cache_ttl_secs)
    }

    /// Rotation parameters
    #[must_use]
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            duty_size: self.rotation.duty_size,
            release_window: self.rotation.release_window,
        }
    }

    /// `bind:port`
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
