//! Configuration loading utilities.

use serde::de::DeserializeOwned;
use std::env;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use crate::logging::{init_logging, LogFormat};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// Failed to parse configuration.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            Self::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    DotEnv,
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "env" => Some(Self::DotEnv),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct ConfigFile {
    path: PathBuf,
    required: bool,
}

/// Configuration builder.
///
/// # Example
///
/// ```ignore
/// use plinth::ConfigBuilder;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     host: String,
///     port: u16,
/// }
///
/// let config: MyConfig = ConfigBuilder::new()
///     .with_dotenv()
///     .with_config_file("config.toml")
///     .build()?;
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    load_default_dotenv: bool,
    config_files: Vec<ConfigFile>,
    #[cfg(feature = "tracing")]
    init_logging: bool,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load environment variables from `.env` file in current directory.
    pub fn with_dotenv(mut self) -> Self {
        self.load_default_dotenv = true;
        self
    }

    /// Load a configuration file.
    ///
    /// File format is detected from extension:
    /// - `.env` - Environment variables (multiple allowed)
    /// - `.toml` / `.yaml` / `.json` - Config file (last one used)
    ///
    /// A missing file is an error. Use [`with_optional_config_file`]
    /// for files that may legitimately be absent.
    ///
    /// [`with_optional_config_file`]: Self::with_optional_config_file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(ConfigFile {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Load a configuration file if it exists.
    ///
    /// A missing file is not an error: the configuration falls back to
    /// environment variables and serde defaults.
    pub fn with_optional_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(ConfigFile {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Initialize logging from environment variables (`LOG_FORMAT`, `RUST_LOG`).
    #[cfg(feature = "tracing")]
    pub fn with_logging_from_env(mut self) -> Self {
        self.init_logging = true;
        self
    }

    /// Build and return the configuration.
    pub fn build<C: DeserializeOwned>(self) -> Result<C, ConfigError> {
        if self.load_default_dotenv {
            let _ = dotenvy::dotenv();
        }

        let mut main_config_file: Option<ConfigFile> = None;

        for file in &self.config_files {
            match ConfigFormat::from_path(&file.path) {
                Some(ConfigFormat::DotEnv) => {
                    if file.path.exists() {
                        let _ = dotenvy::from_path(&file.path);
                    }
                }
                Some(_) => {
                    main_config_file = Some(file.clone());
                }
                None => {
                    let file_name = file.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
                    let is_dotenv = file_name.starts_with(".env") || file_name == "env";
                    if is_dotenv && file.path.exists() {
                        let _ = dotenvy::from_path(&file.path);
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        if self.init_logging {
            init_logging(LogFormat::from_env(), "info");
        }

        match main_config_file {
            Some(file) if file.path.exists() => {
                tracing::info!(path = %file.path.display(), "Using config file");
                load_config_file(&file.path)
            }
            Some(file) if file.required => Err(ConfigError::NotFound(file.path)),
            Some(file) => {
                tracing::warn!(
                    path = %file.path.display(),
                    "Config file not found, using environment variables and defaults"
                );
                load_from_env()
            }
            None => load_from_env(),
        }
    }
}

/// Load config from environment variables only.
pub fn load_from_env<C: DeserializeOwned>() -> Result<C, ConfigError> {
    use config::Config;

    Config::builder()
        .add_source(EnvSource)
        .build()
        .and_then(|c| c.try_deserialize::<C>())
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load config from file with env var overrides.
pub fn load_config_file<C: DeserializeOwned>(path: &Path) -> Result<C, ConfigError> {
    use config::{Config, File};

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    Config::builder()
        .add_source(File::from(path))
        .add_source(EnvSource)
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Custom environment source that maps APP_ENV/RUST_ENV to environment field.
#[derive(Debug, Clone)]
struct EnvSource;

impl config::Source for EnvSource {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        use config::{Environment, Value, ValueKind};

        // Start with default environment source
        let mut map = Environment::default()
            .separator("__")
            .try_parsing(true)
            .collect()?;

        // Map APP_ENV/RUST_ENV to environment if not already set
        if !map.contains_key("environment") {
            if let Ok(val) = env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .or_else(|_| env::var("RUST_ENV"))
            {
                map.insert(
                    "environment".to_string(),
                    Value::new(None, ValueKind::String(val)),
                );
            }
        }

        Ok(map)
    }
}
