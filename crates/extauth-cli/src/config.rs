//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/extauth/config.toml` by default:
//!
//! ```toml
//! [service]
//! empty_frame = "ignore"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use extauth_core::{TracingConfig, TracingOutputFormat};
use extauth_server::{EmptyFramePolicy, ServiceConfig};

use crate::error::{ClientError, ClientResult};

/// Configuration for the extauth binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Protocol handling settings.
    pub service: ServiceSettings,

    /// Log output settings.
    pub logging: LoggingSettings,
}

/// Protocol handling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// What to send back for a zero-length frame.
    pub empty_frame: EmptyFramePolicy,
}

/// Log output settings. Logs always go to stderr.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    pub level: String,

    /// Output format.
    pub format: TracingOutputFormat,

    /// Full env-filter directive; overrides `level`.
    pub filter: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: TracingOutputFormat::Compact,
            filter: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("extauth")
    }

    /// Builds the service configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new().with_empty_frame(self.service.empty_frame)
    }

    /// Builds the tracing configuration.
    ///
    /// `debug` forces debug-level output regardless of the file.
    pub fn tracing_config(&self, debug: bool) -> ClientResult<TracingConfig> {
        let mut config = if debug {
            TracingConfig::debug()
        } else {
            let level: Level = self.logging.level.parse().map_err(|_| {
                ClientError::Config(format!("invalid log level '{}'", self.logging.level))
            })?;
            TracingConfig::default().with_level(level)
        };

        config = config.with_format(self.logging.format);
        if let Some(ref filter) = self.logging.filter {
            config = config.with_env_filter(filter);
        }
        Ok(config)
    }
}
