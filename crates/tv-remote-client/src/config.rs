//! TOML configuration for the client application.
//!
//! Example file:
//!
//! ```toml
//! [device]
//! address = "192.168.1.20"
//! display_name = "living-room"
//!
//! [protocol]
//! port = 55000
//! idle_timeout_ms = 3000
//! auth_timeout_ms = 300000
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return
//! value of `some_fn()` when the field is absent, so a minimal file with
//! only the television address works, and older files keep working when
//! newer fields are added.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

/// The television this client controls, and how the client presents itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Host name or IP address of the television. Required in practice;
    /// the empty default exists so a fresh file can be generated.
    #[serde(default)]
    pub address: String,
    /// Name shown next to the television's allow/deny pairing prompt.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Wire-protocol knobs; the defaults match the deployed televisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProtocolConfig {
    /// TCP port the television listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Socket read-idle threshold in milliseconds.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Ceiling in milliseconds on waiting for the user to answer the
    /// pairing prompt.
    #[serde(default = "default_auth_timeout_ms")]
    pub auth_timeout_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_display_name() -> String {
    "tv-remote".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_port() -> u16 {
    55000
}
fn default_idle_timeout_ms() -> u64 {
    3000
}
fn default_auth_timeout_ms() -> u64 {
    300_000
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            display_name: default_display_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            idle_timeout_ms: default_idle_timeout_ms(),
            auth_timeout_ms: default_auth_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Builds the session-layer configuration from this file schema.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            address: self.device.address.clone(),
            port: self.protocol.port,
            display_name: self.device.display_name.clone(),
            idle_timeout: Duration::from_millis(self.protocol.idle_timeout_ms),
            auth_timeout: Duration::from_millis(self.protocol.auth_timeout_ms),
        }
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads [`AppConfig`] from `path`, returning `AppConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than
/// "not found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
