use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, FailedToBufferBody};
use axum::extract::State;
use axum::{routing::get, Json, Router};
use folio_core::Document;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::AdminSession;
use crate::state::AppState;
use crate::WebError;

pub fn portfolio_routes() -> Router<AppState> {
    Router::new().route("/api/portfolio", get(get_portfolio).post(replace_portfolio))
}

async fn get_portfolio(State(state): State<AppState>) -> Result<Json<Document>, WebError> {
    state
        .service
        .load_presented()
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to read portfolio");
            WebError::read_failed(&e, state.expose_error_detail())
        })
}

/// Replace the whole document. Auth is checked by the extractor before the
/// body is read; size and JSON syntax are checked here so every rejection
/// carries the same error body.
async fn replace_portfolio(
    State(state): State<AppState>,
    _session: AdminSession,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, WebError> {
    let bytes = body.map_err(body_error)?;

    let candidate: Value =
        serde_json::from_slice(&bytes).map_err(|e| WebError::MalformedInput(e.to_string()))?;
    debug!(bytes = bytes.len(), "Received portfolio document");

    state
        .service
        .replace(&candidate)
        .await
        .map_err(|e| WebError::from_portfolio(e, state.expose_error_detail()))?;

    Ok(Json(json!({ "success": true })))
}

/// Only the `DefaultBodyLimit` cap is a size problem; a body that fails
/// mid-stream is reported like any other unreadable input.
fn body_error(rejection: BytesRejection) -> WebError {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            WebError::PayloadTooLarge
        }
        other => {
            debug!(error = %other.body_text(), "Failed to read request body");
            WebError::MalformedInput(other.body_text())
        }
    }
}
