//! Shared SQLite connection
//!
//! One connection behind a mutex rather than a pool crate. A replace holds
//! the connection for its whole transaction, and SQLite admits a single
//! writer anyway.

use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::SqliteConfig;
use crate::error::{SqliteError, SqliteResult};
use crate::schema;

/// Cloneable handle to the database, opened once at startup
#[derive(Clone)]
pub struct SqlitePool {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePool {
    /// Open the database, apply pragmas and bring the schema up to date
    pub fn new(config: SqliteConfig) -> SqliteResult<Self> {
        let conn = open(&config)?;

        debug!("Applying connection pragmas");
        conn.execute_batch(&config.pragma_batch())?;
        if config.foreign_keys {
            ensure_foreign_keys(&conn)?;
        }

        schema::apply_migrations(&conn)?;
        info!(path = ?config.path, "Portfolio database ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Private in-memory database, for tests and demos
    pub fn memory() -> SqliteResult<Self> {
        Self::new(SqliteConfig::memory())
    }

    /// Run `f` with shared access to the connection
    pub fn with_connection<F, T>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        f(&self.conn.lock())
    }

    /// Run `f` with exclusive access, needed to open a transaction
    pub fn with_connection_mut<F, T>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&mut Connection) -> SqliteResult<T>,
    {
        f(&mut self.conn.lock())
    }
}

fn open(config: &SqliteConfig) -> SqliteResult<Connection> {
    if config.is_memory() {
        return Ok(Connection::open_in_memory()?);
    }

    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            SqliteError::Connection(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    info!(path = ?config.path, "Opening SQLite database");
    Ok(Connection::open(&config.path)?)
}

/// Replace relies on cascading deletes, so refuse to run if the pragma did
/// not take (e.g. SQLite built without foreign key support)
fn ensure_foreign_keys(conn: &Connection) -> SqliteResult<()> {
    let enabled: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if enabled != 1 {
        return Err(SqliteError::Connection(
            "foreign key enforcement could not be enabled".to_string(),
        ));
    }
    Ok(())
}
