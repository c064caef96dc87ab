//! # Bridge Configuration
//!
//! Relay and catalog settings in one document.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. JSON file named by `HB_CONFIG`
//! 3. Environment overrides (`HB_HOST`, `HB_PORT`/`PORT`, `HB_WS_PATH`,
//!    `HB_SEND_TIMEOUT`, `HB_ICON_DIR`, `HB_LAUNCHER`)

use hb_01_signal_relay::domain::config::parse_duration;
use hb_01_signal_relay::{ConfigError, RelayConfig};
use hb_02_host_catalog::{CatalogConfig, CATALOG_PATHS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Signal relay and HTTP listener
    pub relay: RelayConfig,
    /// Host application catalog
    pub catalog: CatalogConfig,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl BridgeConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides on top of `self`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), LoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HB_HOST") {
            self.relay.server.host = parse_env("HB_HOST", host, |v| v.parse())?;
        }

        // PORT is honoured for hosting platforms that only set that.
        if let Some(port) = lookup("PORT") {
            self.relay.server.port = parse_env("PORT", port, |v| v.parse())?;
        }
        if let Some(port) = lookup("HB_PORT") {
            self.relay.server.port = parse_env("HB_PORT", port, |v| v.parse())?;
        }

        if let Some(path) = lookup("HB_WS_PATH") {
            self.relay.websocket.path = path;
        }
        if let Some(timeout) = lookup("HB_SEND_TIMEOUT") {
            self.relay.websocket.send_timeout =
                parse_env("HB_SEND_TIMEOUT", timeout, parse_duration)?;
        }
        if let Some(dir) = lookup("HB_ICON_DIR") {
            self.catalog.icon_dir = PathBuf::from(dir);
        }
        if let Some(launcher) = lookup("HB_LAUNCHER") {
            self.catalog.launcher = launcher;
        }

        Ok(())
    }

    /// Validate both halves. The WebSocket path must not collide with a
    /// catalog route on the shared listener.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.relay.validate()?;

        let path = &self.relay.websocket.path;
        if CATALOG_PATHS.contains(&path.as_str()) {
            return Err(ConfigError::InvalidPath(path.clone()).into());
        }
        Ok(())
    }
}

fn parse_env<T, E, P>(var: &'static str, value: String, parse: P) -> Result<T, LoadError>
where
    P: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    parse(value.trim()).map_err(|e| LoadError::Env {
        var,
        reason: e.to_string(),
        value,
    })
}

/// Load configuration from the process environment and files.
pub fn load_config() -> Result<BridgeConfig, LoadError> {
    load_config_with(|key| std::env::var(key).ok())
}

/// [`load_config`] with an injectable environment.
pub fn load_config_with<F>(lookup: F) -> Result<BridgeConfig, LoadError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("HB_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            info!(path = %path.display(), "Loading config file");
            BridgeConfig::from_file(&path)?
        }
        None => BridgeConfig::default(),
    };

    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}
