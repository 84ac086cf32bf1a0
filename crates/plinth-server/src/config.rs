//! Application configuration.

use plinth::{ConfigBuilder, ConfigError, LogFormat};
use plinth_http::ServerConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "Plinth Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, an optional `config.yaml` in the
    /// working directory, and environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        ConfigBuilder::new()
            .with_dotenv()
            .with_optional_config_file("config.yaml")
            .build()
    }
}
