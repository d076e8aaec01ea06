//! The two operations outer surfaces call: load and replace

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::assembler;
use crate::document::{Document, ValidDocument};
use crate::replacer::{self, ReplaceError, ReplaceReport};
use crate::storage::{PortfolioId, PortfolioStore, RowWriter, StorageResult, PORTFOLIO_ID};
use crate::validation::{self, ValidationError};

/// Outcome class a caller propagates to its own client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Validation,
    Server,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Validation => "validation",
            Self::Server => "server",
        }
    }
}

/// Failure of a replace request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    /// Rejected by the validation gate; the store was not touched
    #[error("invalid document: {0}")]
    Validation(#[from] ValidationError),

    /// A store step failed; see [`ReplaceError::may_be_partial`]
    #[error(transparent)]
    Store(#[from] ReplaceError),
}

impl PortfolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Server,
        }
    }
}

/// Load/replace facade over an injected store
#[derive(Clone)]
pub struct PortfolioService {
    store: Arc<dyn PortfolioStore>,
    portfolio_id: PortfolioId,
}

impl PortfolioService {
    /// Create a service over the singleton portfolio
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self {
            store,
            portfolio_id: PORTFOLIO_ID,
        }
    }

    pub fn store(&self) -> &Arc<dyn PortfolioStore> {
        &self.store
    }

    /// Load the stored document, `None` before the first replace
    pub async fn load(&self) -> StorageResult<Option<Document>> {
        assembler::load(self.store.as_ref(), self.portfolio_id).await
    }

    /// Load the document as readers see it: the empty document before the
    /// first replace and never an empty `about` list
    pub async fn load_presented(&self) -> StorageResult<Document> {
        self.load().await.map(Document::presented)
    }

    /// Validate an untyped candidate and replace the stored document with it
    pub async fn replace(&self, candidate: &Value) -> Result<ReplaceReport, PortfolioError> {
        let document = validation::validate(candidate).inspect_err(|e| {
            warn!(field = e.field(), error = %e, "Rejected portfolio document");
        })?;
        self.write(document).await
    }

    /// Replace the stored document with an already-typed one
    pub async fn replace_document(&self, document: &Document) -> Result<ReplaceReport, PortfolioError> {
        let document = validation::validate_document(document)?;
        self.write(document).await
    }

    async fn write(&self, document: ValidDocument) -> Result<ReplaceReport, PortfolioError> {
        let portfolio_id = self.portfolio_id;
        let result = self
            .store
            .write(Box::new(move |writer: &mut dyn RowWriter| {
                replacer::apply(writer, portfolio_id, &document)
            }))
            .await;

        match &result {
            Ok(report) => info!(
                backend = self.store.backend_name(),
                about = report.about,
                projects = report.projects,
                tags = report.tags,
                "Replaced portfolio document"
            ),
            Err(e) => error!(
                backend = self.store.backend_name(),
                step = %e.step,
                partial = e.may_be_partial(),
                retryable = e.source.is_retryable(),
                error = %e.source,
                "Portfolio replace failed"
            ),
        }

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replacer::ReplaceStep;
    use crate::storage::MemoryPortfolioStore;
    use serde_json::json;

    fn service() -> (Arc<MemoryPortfolioStore>, PortfolioService) {
        let store = Arc::new(MemoryPortfolioStore::new());
        (store.clone(), PortfolioService::new(store))
    }

    #[tokio::test]
    async fn test_empty_state() {
        let (_, service) = service();
        assert_eq!(service.load().await.unwrap(), None);
        assert_eq!(
            serde_json::to_value(service.load_presented().await.unwrap()).unwrap(),
            json!({"name": "", "title": "", "about": [""], "projects": []})
        );
    }

    #[tokio::test]
    async fn test_validation_happens_before_store() {
        let (store, service) = service();
        let err = service
            .replace(&json!({"name": "a", "title": "b", "about": "nope", "projects": []}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.row_counts(), (0, 0, 0, 0));
    }

    #[tokio::test]
    async fn test_store_failure_keeps_previous_document() {
        let (store, service) = service();
        let original = json!({"name": "Ada", "title": "Engineer", "about": ["hi"], "projects": []});
        service.replace(&original).await.unwrap();

        store.fail_at(Some(ReplaceStep::InsertAbout));
        let err = service
            .replace(&json!({"name": "Bob", "title": "Other", "about": ["bye"], "projects": []}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Server);
        let PortfolioError::Store(store_err) = err else {
            panic!("expected store error");
        };
        assert_eq!(store_err.step, ReplaceStep::InsertAbout);
        assert!(!store_err.may_be_partial());

        let loaded = service.load().await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ada");
        assert_eq!(loaded.about, vec!["hi"]);
    }

    #[tokio::test]
    async fn test_read_failure_is_not_empty() {
        let (store, service) = service();
        store.fail_reads(true);
        assert!(service.load_presented().await.is_err());
    }
}
