//! SQLite storage backend for Folio
//!
//! Implements [`folio_core::PortfolioStore`] over four normalized tables:
//! `portfolio`, `portfolio_abouts`, `projects` and `project_tags`.
//!
//! ## Features
//!
//! - **Transactional replace**: every write job runs inside one SQLite
//!   transaction and is rolled back if any step fails
//! - **Cascade deletes**: child tables reference their parent with
//!   `ON DELETE CASCADE`, and the writer also deletes tags explicitly
//! - **WAL Mode**: readers are not blocked by the writer on file databases
//! - **Thread Safety**: Arc<Mutex<Connection>> pattern for concurrent access
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_core::PortfolioService;
//! use folio_sqlite::{SqliteConfig, SqlitePool, SqlitePortfolioStore};
//!
//! let pool = SqlitePool::new(SqliteConfig::new("./folio.db"))?;
//! let service = PortfolioService::new(Arc::new(SqlitePortfolioStore::new(pool)));
//! let document = service.load_presented().await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod portfolio_store;
pub mod schema;

// Re-exports
pub use config::SqliteConfig;
pub use connection::SqlitePool;
pub use error::{SqliteError, SqliteResult};
pub use portfolio_store::SqlitePortfolioStore;
