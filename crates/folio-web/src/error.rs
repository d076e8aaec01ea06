use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::{ErrorKind, PortfolioError, ReplaceError, StorageError};
use serde_json::{json, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Error, Debug)]
pub enum WebError {
    /// Missing, unknown or expired bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Login attempt with the wrong password
    #[error("Invalid password")]
    InvalidPassword,

    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid JSON")]
    MalformedInput(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("{message}")]
    Server {
        message: String,
        detail: Option<Value>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebError {
    /// Failed read of the stored document
    pub fn read_failed(err: &StorageError, expose_detail: bool) -> Self {
        Self::Server {
            message: "Failed to read data".to_string(),
            detail: expose_detail.then(|| json!({ "message": err.to_string() })),
        }
    }

    /// Map a replace failure, keeping backend details only when asked to
    pub fn from_portfolio(err: PortfolioError, expose_detail: bool) -> Self {
        match err {
            PortfolioError::Validation(e) => Self::Validation {
                message: "Invalid data format or exceeded size limits".to_string(),
                field: Some(e.field().to_string()),
            },
            PortfolioError::Store(e) => Self::store_failed(&e, expose_detail),
        }
    }

    fn store_failed(err: &ReplaceError, expose_detail: bool) -> Self {
        Self::Server {
            message: format!("Failed to {}", err.step.action()),
            detail: expose_detail.then(|| {
                json!({
                    "message": err.source.to_string(),
                    "step": err.step.to_string(),
                    "partial": err.may_be_partial(),
                })
            }),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::InvalidPassword => ErrorKind::Auth,
            Self::Validation { .. } | Self::MalformedInput(_) | Self::PayloadTooLarge => {
                ErrorKind::Validation
            }
            Self::Server { .. } | Self::Config(_) | Self::Io(_) => ErrorKind::Server,
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Auth => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind().as_str();

        if matches!(self, Self::Config(_) | Self::Io(_)) {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = match self {
            Self::InvalidPassword => json!({
                "success": false,
                "error": "Invalid password",
                "type": kind,
            }),
            Self::Validation {
                message,
                field: Some(field),
            } => json!({ "error": message, "type": kind, "field": field }),
            Self::Server {
                message,
                detail: Some(detail),
            } => json!({ "error": message, "type": kind, "detail": detail }),
            Self::Server { message, .. } => json!({ "error": message, "type": kind }),
            Self::Config(_) | Self::Io(_) => {
                json!({ "error": "Internal server error", "type": kind })
            }
            other => json!({ "error": other.to_string(), "type": kind }),
        };

        (status, Json(body)).into_response()
    }
}
