//! SQLite connection configuration

use std::path::{Path, PathBuf};

/// Settings applied when opening a [`crate::SqlitePool`]
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file, or `:memory:`
    pub path: PathBuf,
    pub wal_mode: bool,
    pub foreign_keys: bool,
    pub busy_timeout_ms: u32,
    /// Negative values are KiB, positive values are pages
    pub cache_size: i64,
    pub mmap_size: u64,
}

impl SqliteConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// In-memory database, mostly for tests
    pub fn memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            wal_mode: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u32) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    #[must_use]
    pub fn with_wal_mode(mut self, wal_mode: bool) -> Self {
        self.wal_mode = wal_mode;
        self
    }

    pub fn is_memory(&self) -> bool {
        self.path.to_str() == Some(":memory:")
    }

    /// PRAGMA statements applied to every fresh connection, as one batch
    pub fn pragma_batch(&self) -> String {
        let mut pragmas = Vec::new();

        // In-memory databases cannot use WAL
        if self.wal_mode && !self.is_memory() {
            pragmas.push("PRAGMA journal_mode = WAL;".to_string());
            pragmas.push("PRAGMA synchronous = NORMAL;".to_string());
        }
        if self.foreign_keys {
            pragmas.push("PRAGMA foreign_keys = ON;".to_string());
        }
        pragmas.push(format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms));
        pragmas.push(format!("PRAGMA cache_size = {};", self.cache_size));
        if self.mmap_size > 0 {
            pragmas.push(format!("PRAGMA mmap_size = {};", self.mmap_size));
        }
        pragmas.push("PRAGMA temp_store = MEMORY;".to_string());

        pragmas.join("\n")
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./folio.db"),
            wal_mode: true,
            foreign_keys: true,
            busy_timeout_ms: 5000,
            cache_size: -8000,
            mmap_size: 0,
        }
    }
}
