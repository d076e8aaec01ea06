//! Admin sessions
//!
//! A correct password buys a random bearer token that expires after the
//! configured TTL. Tokens live only in memory, so a restart logs everyone out.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

/// Issued bearer tokens and their expiry
pub struct SessionStore {
    ttl: Duration,
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);

        Self {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub async fn issue(&self) -> IssuedToken {
        self.issue_at(Utc::now()).await
    }

    pub(crate) async fn issue_at(&self, now: DateTime<Utc>) -> IssuedToken {
        let token = Uuid::new_v4().to_string();
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, expiry| *expiry > now);
        tokens.insert(token.clone(), expires_at);
        debug!(active = tokens.len(), "Issued admin session");

        IssuedToken {
            token,
            expires_in: self.ttl.num_seconds().max(0) as u64,
        }
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now()).await
    }

    pub(crate) async fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let expired = match self.tokens.read().await.get(token) {
            None => return false,
            Some(expiry) => *expiry <= now,
        };

        if expired {
            self.tokens.write().await.remove(token);
        }
        !expired
    }

    /// Forget a token; returns whether it was known
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    pub async fn active(&self) -> usize {
        let now = Utc::now();
        self.tokens
            .read()
            .await
            .values()
            .filter(|expiry| **expiry > now)
            .count()
    }
}

/// Compare in constant time so response latency leaks nothing about the secret
pub(crate) fn password_matches(expected: &str, given: &str) -> bool {
    bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor that admits only requests carrying a live admin token
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // No password configured means the editor is disabled
        if !state.config.admin.is_enabled() {
            return Err(WebError::Unauthorized);
        }

        let token = bearer_token(parts).ok_or(WebError::Unauthorized)?;
        if !state.sessions.is_valid(token).await {
            return Err(WebError::Unauthorized);
        }

        Ok(Self {
            token: token.to_string(),
        })
    }
}
