//! Configuration loading with precedence: defaults < file < env < args

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{ConfigError, ConfigResult, FolioConfig};

pub const ENV_HOST: &str = "FOLIO_HOST";
pub const ENV_PORT: &str = "FOLIO_PORT";
pub const ENV_DB_PATH: &str = "FOLIO_DB_PATH";
pub const ENV_ADMIN_PASSWORD: &str = "FOLIO_ADMIN_PASSWORD";
pub const ENV_LOG: &str = "FOLIO_LOG";

/// Builder that resolves a [`FolioConfig`]
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    skip_env: bool,
    db_path: Option<PathBuf>,
    port: Option<u16>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of the default location. A missing explicit
    /// file is an error.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Ignore `FOLIO_*` environment variables
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Command-line override for the database path
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        self.db_path = path;
        self
    }

    /// Command-line override for the listen port
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Default config file location, e.g. `~/.config/folio/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    /// Resolve and validate the configuration
    pub fn load(&self) -> ConfigResult<FolioConfig> {
        let mut config = match &self.config_file {
            Some(path) => read_file(path)?,
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => read_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    FolioConfig::default()
                }
            },
        };

        if !self.skip_env {
            apply_env(&mut config)?;
        }

        if let Some(path) = &self.db_path {
            config.storage.path = path.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> ConfigResult<FolioConfig> {
    info!(path = %path.display(), "Loading config file");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    FolioConfig::from_toml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env(config: &mut FolioConfig) -> ConfigResult<()> {
    if let Ok(host) = std::env::var(ENV_HOST) {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var(ENV_PORT) {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        config.storage.path = PathBuf::from(path);
    }
    if let Ok(password) = std::env::var(ENV_ADMIN_PASSWORD) {
        config.admin.password = Some(password);
    }
    if let Ok(level) = std::env::var(ENV_LOG) {
        config.logging.level = level;
    }
    Ok(())
}
