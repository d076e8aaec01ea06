use std::sync::Arc;

use anyhow::{Context, Result};
use folio_config::{StorageBackend, StorageConfig};
use folio_core::{MemoryPortfolioStore, PortfolioService, PortfolioStore};
use folio_sqlite::{SqliteConfig, SqlitePool, SqlitePortfolioStore};
use tracing::{info, warn};

/// Open the configured backend
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn PortfolioStore>> {
    match config.backend {
        StorageBackend::Sqlite => {
            let sqlite = SqliteConfig::new(&config.path)
                .with_wal_mode(config.wal_mode)
                .with_busy_timeout_ms(config.busy_timeout_ms);

            let pool = SqlitePool::new(sqlite)
                .with_context(|| format!("Failed to open database {}", config.path.display()))?;
            info!(path = %config.path.display(), "Using SQLite store");
            Ok(Arc::new(SqlitePortfolioStore::new(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory store; changes are lost on exit");
            Ok(Arc::new(MemoryPortfolioStore::new()))
        }
    }
}

pub fn open_service(config: &StorageConfig) -> Result<PortfolioService> {
    Ok(PortfolioService::new(open_store(config)?))
}
