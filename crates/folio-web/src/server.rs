use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::get_service;
use axum::Router;
use folio_config::FolioConfig;
use folio_core::PortfolioService;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::routes::{auth_routes, health_routes, portfolio_routes};
use crate::state::AppState;
use crate::{Result, WebError};

/// Build the application router over `state`
pub fn router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors = cors_layer(&server.cors_origins);
    let body_limit = server.max_body_bytes;
    let static_dir = server.static_dir.clone();

    let app = Router::new()
        .merge(portfolio_routes())
        .merge(auth_routes())
        .merge(health_routes())
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            info!(dir = %dir, "Serving static assets");
            app.fallback_service(
                get_service(ServeDir::new(&dir).append_index_html_on_directories(true))
                    .handle_error(|_| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
        }
        None => app,
    };

    app.layer(DefaultBodyLimit::max(body_limit)).layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Serve the API until ctrl-c
pub async fn start_server(config: FolioConfig, service: PortfolioService) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid address: {e}")))?;

    if !config.admin.is_enabled() {
        warn!("No admin password configured; portfolio writes are disabled");
    }

    let app = router(AppState::new(service, config));

    info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Io)?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
