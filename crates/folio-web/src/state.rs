use std::sync::Arc;

use folio_config::FolioConfig;
use folio_core::PortfolioService;

use crate::auth::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub service: PortfolioService,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<FolioConfig>,
}

impl AppState {
    pub fn new(service: PortfolioService, config: FolioConfig) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(config.admin.session_ttl_seconds)),
            service,
            config: Arc::new(config),
        }
    }

    pub fn expose_error_detail(&self) -> bool {
        self.config.server.expose_error_detail
    }
}
