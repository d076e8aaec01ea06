use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::{password_matches, AdminSession};
use crate::state::AppState;
use crate::WebError;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth", post(login))
        .route("/api/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, WebError> {
    let Json(req) = req.map_err(|e| WebError::MalformedInput(e.body_text()))?;

    let Some(expected) = state.config.admin.password.as_deref().filter(|p| !p.is_empty()) else {
        warn!("Login attempted but no admin password is configured");
        return Err(WebError::InvalidPassword);
    };

    if !password_matches(expected, &req.password) {
        warn!("Rejected admin login");
        return Err(WebError::InvalidPassword);
    }

    let issued = state.sessions.issue().await;
    info!(expires_in = issued.expires_in, "Admin logged in");

    Ok(Json(json!({
        "success": true,
        "token": issued.token,
        "expires_in": issued.expires_in,
    })))
}

async fn logout(State(state): State<AppState>, session: AdminSession) -> Json<Value> {
    state.sessions.revoke(&session.token).await;
    info!("Admin logged out");
    Json(json!({ "success": true }))
}
