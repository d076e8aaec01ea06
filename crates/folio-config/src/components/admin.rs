//! Admin access configuration

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared secret for the admin editor. Writes are refused while unset.
    pub password: Option<String>,
    pub session_ttl_seconds: u64,
}

impl AdminConfig {
    pub fn is_enabled(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: None,
            session_ttl_seconds: 60 * 60,
        }
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .finish()
    }
}
