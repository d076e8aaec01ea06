//! Storage layer: row types, store traits and the in-memory backend

pub mod error;
pub mod memory;
pub mod rows;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryPortfolioStore;
pub use rows::{
    AboutRow, InsertedProject, NewAbout, NewProfile, NewProject, NewTag, PortfolioId,
    PortfolioRows, ProfileRow, ProjectRow, TagRow, PORTFOLIO_ID,
};
pub use traits::{PortfolioStore, RowWriter, WriteJob};
