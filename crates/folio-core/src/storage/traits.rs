//! Store abstraction for the normalized portfolio tables
//!
//! Two layers:
//!
//! - [`RowWriter`] - synchronous row-level primitives, scoped by parent id.
//!   The replace sequence in [`crate::replacer`] is written against it.
//! - [`PortfolioStore`] - the async handle callers hold. Reads return raw
//!   rows; writes hand a [`WriteJob`] to the backend, which runs it inside the
//!   strongest atomicity mechanism it has (a transaction for SQLite).

use async_trait::async_trait;

use super::error::StorageResult;
use super::rows::{InsertedProject, NewAbout, NewProfile, NewProject, NewTag, PortfolioId, PortfolioRows};
use crate::replacer::{ReplaceError, ReplaceReport};

/// Row-level write primitives over the four tables
pub trait RowWriter {
    /// Insert the profile row or overwrite its `name` and `title`
    fn upsert_profile(&mut self, profile: &NewProfile) -> StorageResult<()>;

    /// Delete every about paragraph of the parent, returning the count removed
    fn delete_abouts(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize>;

    fn insert_abouts(&mut self, rows: &[NewAbout]) -> StorageResult<()>;

    /// Delete every project of the parent together with the projects' tags
    fn delete_projects(&mut self, portfolio_id: PortfolioId) -> StorageResult<usize>;

    /// Insert projects, returning one generated id per row
    fn insert_projects(&mut self, rows: &[NewProject]) -> StorageResult<Vec<InsertedProject>>;

    fn insert_tags(&mut self, rows: &[NewTag]) -> StorageResult<()>;
}

/// A unit of write work executed by a backend against its [`RowWriter`]
pub type WriteJob =
    Box<dyn FnOnce(&mut dyn RowWriter) -> Result<ReplaceReport, ReplaceError> + Send + 'static>;

/// Handle to a normalized portfolio store
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Fetch the profile row with all of its children in one logical read.
    ///
    /// Returns `Ok(None)` when no profile row exists yet.
    async fn fetch(&self, portfolio_id: PortfolioId) -> StorageResult<Option<PortfolioRows>>;

    /// Run a write job. Backends with transactions commit only when the job
    /// returns `Ok`, and mark the returned error as rolled back otherwise.
    async fn write(&self, job: WriteJob) -> Result<ReplaceReport, ReplaceError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
