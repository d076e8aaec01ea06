//! Per-component configuration sections

pub mod admin;
pub mod logging;
pub mod server;
pub mod storage;

pub use admin::AdminConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
