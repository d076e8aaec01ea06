//! Schema management and migrations

use crate::error::{SqliteError, SqliteResult};
use rusqlite::Connection;
use tracing::{debug, info};

/// Schema version - increment when making schema changes
pub const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations
pub fn apply_migrations(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = current_version(conn)?;
    debug!(current_version, target_version = SCHEMA_VERSION, "Checking migrations");

    if current_version < 1 {
        info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Applying schema migrations"
        );
        apply_migration_v1(conn)?;
    }

    Ok(())
}

/// Highest applied schema version, 0 for a fresh database
pub fn current_version(conn: &Connection) -> SqliteResult<i32> {
    let version: Option<i32> = conn.query_row(
        "SELECT MAX(version) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    Ok(version.unwrap_or(0))
}

fn record_migration(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: portfolio tables
fn apply_migration_v1(conn: &Connection) -> SqliteResult<()> {
    debug!("Applying migration v1: portfolio tables");

    conn.execute_batch(SCHEMA_V1).map_err(|e| {
        SqliteError::Schema(format!("Failed to apply v1 schema: {}", e))
    })?;

    record_migration(conn, 1)?;
    info!("Migration v1 applied successfully");
    Ok(())
}

/// Initial schema SQL
const SCHEMA_V1: &str = r#"
-- ============================================================================
-- TABLE: portfolio
-- ============================================================================
-- Singleton profile row

CREATE TABLE IF NOT EXISTS portfolio (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT,
    title TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- TABLE: portfolio_abouts
-- ============================================================================
-- Ordered about paragraphs

CREATE TABLE IF NOT EXISTS portfolio_abouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    portfolio_id INTEGER NOT NULL REFERENCES portfolio(id) ON DELETE CASCADE,
    content TEXT,
    sort_order INTEGER
);

CREATE INDEX IF NOT EXISTS idx_portfolio_abouts_parent ON portfolio_abouts(portfolio_id, sort_order);

-- ============================================================================
-- TABLE: projects
-- ============================================================================
-- Ordered projects

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    portfolio_id INTEGER NOT NULL REFERENCES portfolio(id) ON DELETE CASCADE,
    title TEXT,
    description TEXT,
    sort_order INTEGER
);

CREATE INDEX IF NOT EXISTS idx_projects_parent ON projects(portfolio_id, sort_order);

-- ============================================================================
-- TABLE: project_tags
-- ============================================================================
-- Ordered tags per project

CREATE TABLE IF NOT EXISTS project_tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    tag TEXT,
    sort_order INTEGER
);

CREATE INDEX IF NOT EXISTS idx_project_tags_parent ON project_tags(project_id, sort_order);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_applies_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();

        let version = current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_migrations(&conn).unwrap();
        apply_migrations(&conn).unwrap();

        let version = current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_deleting_project_cascades_to_tags() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        apply_migrations(&conn).unwrap();

        conn.execute_batch(
            r#"
            INSERT INTO portfolio (id, name, title) VALUES (1, 'Ada', 'Engineer');
            INSERT INTO projects (id, portfolio_id, title, sort_order) VALUES (10, 1, 'A', 0);
            INSERT INTO project_tags (project_id, tag, sort_order) VALUES (10, 'x', 0);
            "#,
        )
        .unwrap();

        conn.execute("DELETE FROM projects WHERE portfolio_id = 1", [])
            .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM project_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_orphan_tag_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        apply_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO project_tags (project_id, tag, sort_order) VALUES (99, 'x', 0)",
            [],
        );
        assert!(result.is_err());
    }
}
