//! Rebuild the nested document from unordered row sets
//!
//! Stores make no ordering promise on joined fetches, so every collection is
//! sorted by its persisted `sort_order` here. A missing order sorts as 0 and
//! ties keep fetch order.

use tracing::debug;

use crate::document::{Document, Project};
use crate::storage::{PortfolioId, PortfolioRows, PortfolioStore, StorageResult};

/// Turn fetched rows into a document
pub fn assemble(rows: PortfolioRows) -> Document {
    let PortfolioRows {
        profile,
        mut abouts,
        mut projects,
    } = rows;

    abouts.sort_by_key(|row| row.sort_order.unwrap_or(0));
    projects.sort_by_key(|row| row.sort_order.unwrap_or(0));

    let about = abouts
        .into_iter()
        .map(|row| row.content.unwrap_or_default())
        .collect();

    let projects = projects
        .into_iter()
        .map(|mut project| {
            project.tags.sort_by_key(|tag| tag.sort_order.unwrap_or(0));
            Project {
                title: project.title.unwrap_or_default(),
                description: project.description.unwrap_or_default(),
                tags: project
                    .tags
                    .into_iter()
                    .map(|tag| tag.tag.unwrap_or_default())
                    .collect(),
            }
        })
        .collect();

    Document {
        name: profile.name.unwrap_or_default(),
        title: profile.title.unwrap_or_default(),
        about,
        projects,
    }
}

/// Load the document for `portfolio_id`.
///
/// `Ok(None)` means no profile row exists yet, which is a valid state and not
/// an error.
pub async fn load(
    store: &dyn PortfolioStore,
    portfolio_id: PortfolioId,
) -> StorageResult<Option<Document>> {
    let Some(rows) = store.fetch(portfolio_id).await? else {
        debug!(portfolio_id, "No portfolio row yet");
        return Ok(None);
    };

    Ok(Some(assemble(rows)))
}
