//! Integration tests for the SQLite portfolio store
//!
//! Exercises load/replace through `PortfolioService` with a real on-disk
//! database.

use std::cmp::Reverse;
use std::sync::Arc;

use folio_core::assembler::assemble;
use folio_core::storage::{PortfolioStore, PORTFOLIO_ID};
use folio_core::{Document, PortfolioService, Project};
use folio_sqlite::{SqliteConfig, SqlitePool, SqlitePortfolioStore};
use serde_json::json;
use tempfile::TempDir;

/// Setup helper: service over a fresh database file
fn setup() -> (TempDir, SqlitePool, PortfolioService) {
    let dir = TempDir::new().unwrap();
    let pool = SqlitePool::new(SqliteConfig::new(dir.path().join("folio.db"))).unwrap();
    let service = PortfolioService::new(Arc::new(SqlitePortfolioStore::new(pool.clone())));
    (dir, pool, service)
}

fn count(pool: &SqlitePool, table: &str) -> i64 {
    pool.with_connection(|conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
    })
    .unwrap()
}

fn sample() -> Document {
    Document::new("Ada Lovelace", "Analyst")
        .with_about(["First", "Second"])
        .with_projects(vec![
            Project::new("A", "alpha").with_tags(["x", "y"]),
            Project::new("B", "beta").with_tags(["z"]),
        ])
}

#[tokio::test]
async fn test_empty_database_presents_empty_document() {
    let (_dir, _pool, service) = setup();

    assert_eq!(service.load().await.unwrap(), None);
    assert_eq!(
        serde_json::to_value(service.load_presented().await.unwrap()).unwrap(),
        json!({"name": "", "title": "", "about": [""], "projects": []})
    );
}

#[tokio::test]
async fn test_round_trip_and_order_columns() {
    let (_dir, pool, service) = setup();

    service.replace_document(&sample()).await.unwrap();
    assert_eq!(service.load().await.unwrap(), Some(sample()));

    let orders: Vec<i64> = pool
        .with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT sort_order FROM project_tags ORDER BY id")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .unwrap();
    assert_eq!(orders, vec![0, 1, 0]);
}

#[tokio::test]
async fn test_tag_remap_after_ids_move_on() {
    let (_dir, _pool, service) = setup();

    // Several writes so AUTOINCREMENT ids drift far from array positions
    for _ in 0..3 {
        service.replace_document(&sample()).await.unwrap();
    }

    service
        .replace(&json!({
            "name": "n",
            "title": "t",
            "about": [],
            "projects": [
                {"title": "A", "description": "", "tags": ["x", "y"]},
                {"title": "B", "description": "", "tags": ["z"]},
            ],
        }))
        .await
        .unwrap();

    let doc = service.load().await.unwrap().unwrap();
    assert_eq!(doc.projects[0].title, "A");
    assert_eq!(doc.projects[0].tags, vec!["x", "y"]);
    assert_eq!(doc.projects[1].title, "B");
    assert_eq!(doc.projects[1].tags, vec!["z"]);
}

#[tokio::test]
async fn test_replace_is_idempotent_and_leaves_no_orphans() {
    let (_dir, pool, service) = setup();

    service.replace_document(&sample()).await.unwrap();
    service.replace_document(&sample()).await.unwrap();

    assert_eq!(service.load().await.unwrap(), Some(sample()));
    assert_eq!(count(&pool, "portfolio"), 1);
    assert_eq!(count(&pool, "portfolio_abouts"), 2);
    assert_eq!(count(&pool, "projects"), 2);
    assert_eq!(count(&pool, "project_tags"), 3);
}

#[tokio::test]
async fn test_sort_order_wins_over_fetch_order() {
    let (_dir, pool, service) = setup();

    pool.with_connection(|conn| {
        conn.execute_batch(
            r#"
            INSERT INTO portfolio (id, name, title) VALUES (1, 'Ada', 'Analyst');
            INSERT INTO portfolio_abouts (portfolio_id, content, sort_order) VALUES
                (1, 'third', 2), (1, 'first', 0), (1, 'second', 1);
            INSERT INTO projects (id, portfolio_id, title, description, sort_order) VALUES
                (50, 1, 'Later', NULL, 1), (40, 1, 'Earlier', 'd', 0);
            INSERT INTO project_tags (project_id, tag, sort_order) VALUES
                (40, 'b', 1), (50, 'only', 0), (40, 'a', 0);
            "#,
        )?;
        Ok(())
    })
    .unwrap();

    let expected_projects = vec![
        Project::new("Earlier", "d").with_tags(["a", "b"]),
        Project::new("Later", "").with_tags(["only"]),
    ];

    let doc = service.load().await.unwrap().unwrap();
    assert_eq!(doc.about, vec!["first", "second", "third"]);
    assert_eq!(doc.projects, expected_projects);

    // The (portfolio_id, sort_order) indexes may already hand rows back
    // sorted, so put every collection in descending order before assembling
    let store = SqlitePortfolioStore::new(pool.clone());
    let mut rows = store.fetch(PORTFOLIO_ID).await.unwrap().unwrap();
    rows.abouts.sort_by_key(|about| Reverse(about.sort_order));
    rows.projects.sort_by_key(|project| Reverse(project.sort_order));
    for project in &mut rows.projects {
        project.tags.sort_by_key(|tag| Reverse(tag.sort_order));
    }
    assert_eq!(rows.abouts[0].content.as_deref(), Some("third"));
    assert_eq!(rows.projects[0].title.as_deref(), Some("Later"));

    let doc = assemble(rows);
    assert_eq!(doc.about, vec!["first", "second", "third"]);
    assert_eq!(doc.projects, expected_projects);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("folio.db");

    {
        let pool = SqlitePool::new(SqliteConfig::new(&path)).unwrap();
        let service = PortfolioService::new(Arc::new(SqlitePortfolioStore::new(pool)));
        service.replace_document(&sample()).await.unwrap();
    }

    let pool = SqlitePool::new(SqliteConfig::new(&path)).unwrap();
    let service = PortfolioService::new(Arc::new(SqlitePortfolioStore::new(pool)));
    assert_eq!(service.load().await.unwrap(), Some(sample()));
}

#[tokio::test]
async fn test_rejected_document_leaves_database_untouched() {
    let (_dir, pool, service) = setup();
    service.replace_document(&sample()).await.unwrap();

    let result = service
        .replace(&json!({"name": "n", "title": "t", "about": "x", "projects": []}))
        .await;
    assert!(result.is_err());

    assert_eq!(service.load().await.unwrap(), Some(sample()));
    assert_eq!(count(&pool, "project_tags"), 3);
}
