//! Core of the Folio portfolio manager
//!
//! Folio keeps a single nested portfolio document (profile, about paragraphs,
//! projects and their tags) in four normalized relational tables. This crate
//! owns everything between the outer surfaces and the storage backend:
//!
//! - [`validation`] - structural and size checks on an incoming candidate
//! - [`assembler`] - rebuilds the nested document from unordered row sets
//! - [`replacer`] - the delete-then-reinsert write sequence
//! - [`storage`] - row types, store traits and an in-memory backend
//! - [`service`] - the two operations callers use: load and replace
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_core::{MemoryPortfolioStore, PortfolioService};
//!
//! let service = PortfolioService::new(Arc::new(MemoryPortfolioStore::new()));
//! service.replace(&serde_json::json!({
//!     "name": "Ada",
//!     "title": "Engineer",
//!     "about": ["Hello"],
//!     "projects": [],
//! })).await?;
//! let document = service.load_presented().await?;
//! ```

pub mod assembler;
pub mod document;
pub mod replacer;
pub mod service;
pub mod storage;
pub mod validation;

pub use document::{Document, Project, ValidDocument};
pub use replacer::{ReplaceError, ReplaceReport, ReplaceStep};
pub use service::{ErrorKind, PortfolioError, PortfolioService};
pub use storage::{
    MemoryPortfolioStore, PortfolioId, PortfolioRows, PortfolioStore, RowWriter, StorageError,
    StorageResult, PORTFOLIO_ID,
};
pub use validation::{validate, validate_document, Limits, ValidationError};
