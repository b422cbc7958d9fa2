use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::PathBuf};

use crate::broker::BrokerKind;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5080";
pub const DEFAULT_SEED: usize = 5;

/// Settings for hosting the forecast API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Number of sample forecasts created at startup.
    pub seed: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Where to find a forecast API when acting as a client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Broker used by `serve`: "local" or "remote".
    pub default_broker: Option<String>,

    /// Example TOML:
    /// [server]
    /// bind_addr = "127.0.0.1:5080"
    /// seed = 5
    #[serde(default)]
    pub server: ServerConfig,

    /// Example TOML:
    /// [remote]
    /// base_url = "http://127.0.0.1:5080"
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// The configured default broker, `Local` when unset.
    pub fn default_broker_kind(&self) -> Result<BrokerKind> {
        match self.default_broker.as_deref() {
            Some(s) => BrokerKind::try_from(s),
            None => Ok(BrokerKind::Local),
        }
    }

    pub fn set_default_broker(&mut self, kind: BrokerKind) {
        self.default_broker = Some(kind.as_str().to_string());
    }

    pub fn set_remote_base_url(&mut self, url: impl Into<String>) {
        self.remote.base_url = Some(url.into());
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.server.bind_addr))
    }

    /// API base URL for client commands: the configured remote, or the local server address.
    pub fn client_base_url(&self) -> String {
        match &self.remote.base_url {
            Some(url) => url.clone(),
            None => format!("http://{}", self.server.bind_addr),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast-demo", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
