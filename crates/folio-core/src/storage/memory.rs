//! In-memory portfolio store
//!
//! Behaves like a small relational store: ids are auto-incremented, child
//! rows are kept in hash maps so fetches come back in arbitrary order, and
//! deleting a project removes its tags. Failures can be injected per step to
//! exercise the error paths of the replace sequence.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::rows::{
    AboutRow, InsertedProject, NewAbout, NewProfile, NewProject, NewTag, PortfolioId,
    PortfolioRows, ProfileRow, ProjectRow, TagRow,
};
use super::traits::{PortfolioStore, RowWriter, WriteJob};
use crate::replacer::{ReplaceError, ReplaceReport, ReplaceStep};

#[derive(Debug, Clone)]
struct StoredAbout {
    portfolio_id: PortfolioId,
    content: String,
    sort_order: i64,
}

#[derive(Debug, Clone)]
struct StoredProject {
    portfolio_id: PortfolioId,
    title: String,
    description: String,
    sort_order: i64,
}

#[derive(Debug, Clone)]
struct StoredTag {
    project_id: i64,
    tag: String,
    sort_order: i64,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: HashMap<PortfolioId, ProfileRow>,
    abouts: HashMap<i64, StoredAbout>,
    projects: HashMap<i64, StoredProject>,
    tags: HashMap<i64, StoredTag>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn fetch(&self, portfolio_id: PortfolioId) -> Option<PortfolioRows> {
        let profile = self.profiles.get(&portfolio_id)?.clone();

        let abouts = self
            .abouts
            .values()
            .filter(|row| row.portfolio_id == portfolio_id)
            .map(|row| AboutRow {
                content: Some(row.content.clone()),
                sort_order: Some(row.sort_order),
            })
            .collect();

        let projects = self
            .projects
            .iter()
            .filter(|(_, row)| row.portfolio_id == portfolio_id)
            .map(|(&id, row)| ProjectRow {
                id,
                title: Some(row.title.clone()),
                description: Some(row.description.clone()),
                sort_order: Some(row.sort_order),
                tags: self
                    .tags
                    .values()
                    .filter(|tag| tag.project_id == id)
                    .map(|tag| TagRow {
                        tag: Some(tag.tag.clone()),
                        sort_order: Some(tag.sort_order),
                    })
                    .collect(),
            })
            .collect();

        Some(PortfolioRows {
            profile,
            abouts,
            projects,
        })
    }
}

struct MemoryRowWriter<'a> {
    tables: &'a mut Tables,
    fail_at: Option<ReplaceStep>,
}

impl MemoryRowWriter<'_> {
    fn check(&self, step: ReplaceStep) -> StorageResult<()> {
        if self.fail_at == Some(step) {
            return Err(StorageError::Injected(format!("failure injected at {step}")));
        }
        Ok(())
    }
}

impl RowWriter for MemoryRowWriter<'_> {
    fn upsert_profile(&mut self, profile: &NewProfile) -> StorageResult<()> {
        self.check(ReplaceStep::UpsertProfile)?;
        self.tables.profiles.insert(
            profile.id,
            ProfileRow {
                id: profile.id,
                name: Some(profile.name.clone()),
                title: Some(profile.title.clone()),
            },
        );
        Ok(())
    }

    fn delete_abouts(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize> {
        self.check(ReplaceStep::ClearAbout)?;
        let before = self.tables.abouts.len();
        self.tables
            .abouts
            .retain(|_, row| row.portfolio_id != portfolio_id);
        Ok(before - self.tables.abouts.len())
    }

    fn insert_abouts(&mut self, rows: &[NewAbout]) -> StorageResult<()> {
        self.check(ReplaceStep::InsertAbout)?;
        for row in rows {
            if !self.tables.profiles.contains_key(&row.portfolio_id) {
                return Err(StorageError::constraint(format!(
                    "portfolio {} does not exist",
                    row.portfolio_id
                )));
            }
            let id = self.tables.next_id();
            self.tables.abouts.insert(
                id,
                StoredAbout {
                    portfolio_id: row.portfolio_id,
                    content: row.content.clone(),
                    sort_order: row.sort_order,
                },
            );
        }
        Ok(())
    }

    fn delete_projects(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize> {
        self.check(ReplaceStep::ClearProjects)?;
        let doomed: HashSet<i64> = self
            .tables
            .projects
            .iter()
            .filter(|(_, row)| row.portfolio_id == portfolio_id)
            .map(|(&id, _)| id)
            .collect();

        self.tables
            .tags
            .retain(|_, tag| !doomed.contains(&tag.project_id));
        self.tables.projects.retain(|id, _| !doomed.contains(id));
        Ok(doomed.len())
    }

    fn insert_projects(&mut self, rows: &[NewProject]) -> StorageResult<Vec<InsertedProject>> {
        self.check(ReplaceStep::InsertProjects)?;
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            if !self.tables.profiles.contains_key(&row.portfolio_id) {
                return Err(StorageError::constraint(format!(
                    "portfolio {} does not exist",
                    row.portfolio_id
                )));
            }
            let id = self.tables.next_id();
            self.tables.projects.insert(
                id,
                StoredProject {
                    portfolio_id: row.portfolio_id,
                    title: row.title.clone(),
                    description: row.description.clone(),
                    sort_order: row.sort_order,
                },
            );
            inserted.push(InsertedProject {
                id,
                sort_order: Some(row.sort_order),
            });
        }
        Ok(inserted)
    }

    fn insert_tags(&mut self, rows: &[NewTag]) -> StorageResult<()> {
        self.check(ReplaceStep::InsertTags)?;
        for row in rows {
            if !self.tables.projects.contains_key(&row.project_id) {
                return Err(StorageError::constraint(format!(
                    "project {} does not exist",
                    row.project_id
                )));
            }
            let id = self.tables.next_id();
            self.tables.tags.insert(
                id,
                StoredTag {
                    project_id: row.project_id,
                    tag: row.tag.clone(),
                    sort_order: row.sort_order,
                },
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_at: Option<ReplaceStep>,
    fail_reads: bool,
}

/// In-memory implementation of [`PortfolioStore`]
#[derive(Debug)]
pub struct MemoryPortfolioStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
    transactional: bool,
}

impl Default for MemoryPortfolioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPortfolioStore {
    /// Create an empty store whose writes are all-or-nothing
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            faults: Mutex::new(Faults::default()),
            transactional: true,
        }
    }

    /// Create an empty store that applies each step directly, so a failed
    /// write leaves its earlier steps in place
    pub fn without_transactions() -> Self {
        Self {
            transactional: false,
            ..Self::new()
        }
    }

    /// Make the next writes fail when they reach `step`
    pub fn fail_at(&self, step: Option<ReplaceStep>) {
        self.faults.lock().fail_at = step;
    }

    /// Make fetches fail
    pub fn fail_reads(&self, fail: bool) {
        self.faults.lock().fail_reads = fail;
    }

    /// Number of stored rows per table: (profiles, abouts, projects, tags)
    pub fn row_counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.tables.lock();
        (
            tables.profiles.len(),
            tables.abouts.len(),
            tables.projects.len(),
            tables.tags.len(),
        )
    }
}

#[async_trait]
impl PortfolioStore for MemoryPortfolioStore {
    async fn fetch(&self, portfolio_id: PortfolioId) -> StorageResult<Option<PortfolioRows>> {
        if self.faults.lock().fail_reads {
            return Err(StorageError::Injected("read failure injected".to_string()));
        }
        Ok(self.tables.lock().fetch(portfolio_id))
    }

    async fn write(&self, job: WriteJob) -> Result<ReplaceReport, ReplaceError> {
        let fail_at = self.faults.lock().fail_at;
        let mut tables = self.tables.lock();

        if !self.transactional {
            let mut writer = MemoryRowWriter {
                tables: &mut *tables,
                fail_at,
            };
            return job(&mut writer);
        }

        let mut staged = tables.clone();
        let mut writer = MemoryRowWriter {
            tables: &mut staged,
            fail_at,
        };
        let report = job(&mut writer).map_err(ReplaceError::rolled_back)?;

        if fail_at == Some(ReplaceStep::Commit) {
            return Err(ReplaceError::at(
                ReplaceStep::Commit,
                StorageError::Injected("failure injected at commit".to_string()),
            )
            .rolled_back());
        }

        *tables = staged;
        debug!(?report, "Committed in-memory write");
        Ok(report)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
