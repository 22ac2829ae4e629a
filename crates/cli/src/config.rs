use bgbridge_brokers_bitget::BitgetConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Non-secret settings loaded from an optional TOML file.
///
/// Credentials are never read from here; they come from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub exchange: BitgetConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Exchange settings with a flag/env base URL taking precedence.
    pub fn exchange(&self, base_url: Option<String>) -> BitgetConfig {
        let mut config = self.exchange.clone();
        if let Some(url) = base_url {
            config.base_url = url;
        }
        config
    }

    /// Bind address: flag, then file, then the default.
    pub fn bind(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }
}
