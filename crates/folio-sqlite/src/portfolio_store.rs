//! PortfolioStore implementation for SQLite

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use folio_core::replacer::{ReplaceError, ReplaceReport, ReplaceStep};
use folio_core::storage::{
    AboutRow, InsertedProject, NewAbout, NewProfile, NewProject, NewTag, PortfolioId,
    PortfolioRows, PortfolioStore, ProfileRow, ProjectRow, RowWriter, StorageError,
    StorageResult, TagRow, WriteJob,
};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::connection::SqlitePool;
use crate::error::{SqliteError, SqliteResult};

/// SQLite implementation of [`PortfolioStore`]
#[derive(Clone)]
pub struct SqlitePortfolioStore {
    pool: SqlitePool,
}

impl SqlitePortfolioStore {
    /// Create a store over an already initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PortfolioStore for SqlitePortfolioStore {
    async fn fetch(&self, portfolio_id: PortfolioId) -> StorageResult<Option<PortfolioRows>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            pool.with_connection_mut(|conn| {
                // One read transaction so the four selects see the same state
                let tx = conn.transaction()?;
                let rows = fetch_rows(&tx, portfolio_id)?;
                tx.commit()?;
                Ok(rows)
            })
        })
        .await
        .map_err(|e| SqliteError::Task(e.to_string()))?
        .map_err(Into::into)
    }

    async fn write(&self, job: WriteJob) -> Result<ReplaceReport, ReplaceError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || pool.with_connection_mut(|conn| Ok(run_job(conn, job))))
            .await
            .map_err(|e| ReplaceError::at(ReplaceStep::Begin, SqliteError::Task(e.to_string()).into()))?
            .map_err(|e| ReplaceError::at(ReplaceStep::Begin, e.into()).rolled_back())?
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// Run a write job inside one transaction, committing only on success
fn run_job(conn: &mut Connection, job: WriteJob) -> Result<ReplaceReport, ReplaceError> {
    let tx = conn
        .transaction()
        .map_err(|e| ReplaceError::at(ReplaceStep::Begin, storage_error(e)).rolled_back())?;

    let result = {
        let mut writer = SqliteRowWriter { conn: &tx };
        job(&mut writer)
    };

    match result {
        Ok(report) => {
            tx.commit()
                .map_err(|e| ReplaceError::at(ReplaceStep::Commit, storage_error(e)).rolled_back())?;
            debug!(?report, "Committed portfolio transaction");
            Ok(report)
        }
        Err(err) => {
            if let Err(e) = tx.rollback() {
                warn!(error = %e, "Rollback failed; dropping transaction");
            }
            Err(err.rolled_back())
        }
    }
}

fn storage_error(err: rusqlite::Error) -> StorageError {
    SqliteError::from(err).into()
}

/// Row-level writes against a connection or open transaction
struct SqliteRowWriter<'a> {
    conn: &'a Connection,
}

impl RowWriter for SqliteRowWriter<'_> {
    fn upsert_profile(&mut self, profile: &NewProfile) -> StorageResult<()> {
        // ON CONFLICT UPDATE rather than INSERT OR REPLACE: a replace would
        // delete the row and cascade into every child table.
        self.conn
            .execute(
                r#"
                INSERT INTO portfolio (id, name, title, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    title = excluded.title,
                    updated_at = excluded.updated_at
                "#,
                params![
                    profile.id,
                    profile.name,
                    profile.title,
                    Utc::now().to_rfc3339()
                ],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    fn delete_abouts(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize> {
        self.conn
            .execute(
                "DELETE FROM portfolio_abouts WHERE portfolio_id = ?1",
                [portfolio_id],
            )
            .map_err(storage_error)
    }

    fn insert_abouts(&mut self, rows: &[NewAbout]) -> StorageResult<()> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO portfolio_abouts (portfolio_id, content, sort_order) VALUES (?1, ?2, ?3)",
            )
            .map_err(storage_error)?;

        for row in rows {
            stmt.execute(params![row.portfolio_id, row.content, row.sort_order])
                .map_err(storage_error)?;
        }
        Ok(())
    }

    fn delete_projects(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize> {
        // Explicit so tags go even when foreign keys are off
        self.conn
            .execute(
                r#"
                DELETE FROM project_tags
                WHERE project_id IN (SELECT id FROM projects WHERE portfolio_id = ?1)
                "#,
                [portfolio_id],
            )
            .map_err(storage_error)?;

        self.conn
            .execute("DELETE FROM projects WHERE portfolio_id = ?1", [portfolio_id])
            .map_err(storage_error)
    }

    fn insert_projects(&mut self, rows: &[NewProject]) -> StorageResult<Vec<InsertedProject>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                r#"
                INSERT INTO projects (portfolio_id, title, description, sort_order)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING id, sort_order
                "#,
            )
            .map_err(storage_error)?;

        rows.iter()
            .map(|row| {
                stmt.query_row(
                    params![row.portfolio_id, row.title, row.description, row.sort_order],
                    |r| {
                        Ok(InsertedProject {
                            id: r.get(0)?,
                            sort_order: r.get(1)?,
                        })
                    },
                )
                .map_err(storage_error)
            })
            .collect()
    }

    fn insert_tags(&mut self, rows: &[NewTag]) -> StorageResult<()> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO project_tags (project_id, tag, sort_order) VALUES (?1, ?2, ?3)",
            )
            .map_err(storage_error)?;

        for row in rows {
            stmt.execute(params![row.project_id, row.tag, row.sort_order])
                .map_err(storage_error)?;
        }
        Ok(())
    }
}

/// Read the profile and its children. Rows come back unordered; the
/// assembler sorts them.
fn fetch_rows(conn: &Connection, portfolio_id: PortfolioId) -> SqliteResult<Option<PortfolioRows>> {
    let profile = conn
        .query_row(
            "SELECT id, name, title FROM portfolio WHERE id = ?1",
            [portfolio_id],
            |row| {
                Ok(ProfileRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    title: row.get(2)?,
                })
            },
        )
        .optional()?;

    let Some(profile) = profile else {
        return Ok(None);
    };

    let abouts = {
        let mut stmt =
            conn.prepare("SELECT content, sort_order FROM portfolio_abouts WHERE portfolio_id = ?1")?;
        let rows = stmt.query_map([portfolio_id], |row| {
            Ok(AboutRow {
                content: row.get(0)?,
                sort_order: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut tags_by_project: HashMap<i64, Vec<TagRow>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.project_id, t.tag, t.sort_order
            FROM project_tags t
            JOIN projects p ON p.id = t.project_id
            WHERE p.portfolio_id = ?1
            "#,
        )?;
        let rows = stmt.query_map([portfolio_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                TagRow {
                    tag: row.get(1)?,
                    sort_order: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (project_id, tag) = row?;
            tags_by_project.entry(project_id).or_default().push(tag);
        }
    }

    let projects = {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, sort_order FROM projects WHERE portfolio_id = ?1",
        )?;
        let rows = stmt.query_map([portfolio_id], |row| {
            Ok(ProjectRow {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                sort_order: row.get(3)?,
                tags: Vec::new(),
            })
        })?;

        let mut projects = rows.collect::<Result<Vec<_>, _>>()?;
        for project in &mut projects {
            project.tags = tags_by_project.remove(&project.id).unwrap_or_default();
        }
        projects
    };

    Ok(Some(PortfolioRows {
        profile,
        abouts,
        projects,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqlitePortfolioStore {
        SqlitePortfolioStore::new(SqlitePool::memory().expect("Failed to create pool"))
    }

    #[tokio::test]
    async fn test_fetch_missing_profile() {
        let store = store();
        assert_eq!(store.fetch(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_defaults_nulls() {
        let store = store();
        store
            .pool()
            .with_connection(|conn| {
                conn.execute_batch(
                    r#"
                    INSERT INTO portfolio (id) VALUES (1);
                    INSERT INTO portfolio_abouts (portfolio_id) VALUES (1);
                    "#,
                )?;
                Ok(())
            })
            .unwrap();

        let rows = store.fetch(1).await.unwrap().unwrap();
        assert_eq!(rows.profile.name, None);
        assert_eq!(rows.abouts, vec![AboutRow::default()]);
    }

    #[tokio::test]
    async fn test_upsert_keeps_children() {
        let store = store();
        store
            .pool()
            .with_connection(|conn| {
                let mut writer = SqliteRowWriter { conn };
                let profile = NewProfile {
                    id: 1,
                    name: "Ada".to_string(),
                    title: "Engineer".to_string(),
                };
                writer.upsert_profile(&profile).unwrap();
                writer
                    .insert_abouts(&[NewAbout {
                        portfolio_id: 1,
                        content: "hi".to_string(),
                        sort_order: 0,
                    }])
                    .unwrap();
                writer
                    .upsert_profile(&NewProfile {
                        name: "Ada L".to_string(),
                        ..profile
                    })
                    .unwrap();
                Ok(())
            })
            .unwrap();

        let rows = store.fetch(1).await.unwrap().unwrap();
        assert_eq!(rows.profile.name.as_deref(), Some("Ada L"));
        assert_eq!(rows.abouts.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_job_rolls_back() {
        let store = store();

        let err = store
            .write(Box::new(|writer: &mut dyn RowWriter| {
                writer
                    .upsert_profile(&NewProfile {
                        id: 1,
                        name: "Ada".to_string(),
                        title: "Engineer".to_string(),
                    })
                    .map_err(|e| ReplaceError::at(ReplaceStep::UpsertProfile, e))?;
                // Orphan tag violates the foreign key
                writer
                    .insert_tags(&[NewTag {
                        project_id: 404,
                        tag: "x".to_string(),
                        sort_order: 0,
                    }])
                    .map_err(|e| ReplaceError::at(ReplaceStep::InsertTags, e))?;
                Ok(ReplaceReport::default())
            }))
            .await
            .unwrap_err();

        assert_eq!(err.step, ReplaceStep::InsertTags);
        assert!(matches!(err.source, StorageError::Constraint(_)));
        assert!(err.is_rolled_back());
        assert_eq!(store.fetch(1).await.unwrap(), None);
    }
}
