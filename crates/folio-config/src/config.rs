//! Top-level configuration and validation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{AdminConfig, LoggingConfig, ServerConfig, StorageConfig};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete folio configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

impl FolioConfig {
    /// Parse a TOML document; missing sections and fields take defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                field: "server.port",
                reason: "must be non-zero".to_string(),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "server.max_body_bytes",
                reason: "must be non-zero".to_string(),
            });
        }

        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage.path",
                reason: "must not be empty".to_string(),
            });
        }

        if self.admin.session_ttl_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "admin.session_ttl_seconds",
                reason: "must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

impl ServerConfig {
    /// `host:port` suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
