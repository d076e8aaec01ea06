//! HTTP server configuration

use serde::{Deserialize, Serialize};

/// Default request body limit, about 1 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prebuilt front-end to serve at `/`, if any
    pub static_dir: Option<String>,
    pub max_body_bytes: usize,
    /// Include backend error details in 500 responses
    pub expose_error_detail: bool,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            expose_error_detail: false,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}
