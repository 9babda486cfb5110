use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use chatbot_types::api::ErrorResponse;

/// Every way a store operation can fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Forbidden: Invalid API Key")]
    Forbidden,
    #[error("User already exists")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("Invalid credentials")]
    Unauthorized,
    /// Any storage failure. `details` carries the underlying error text.
    #[error("{context}")]
    Internal {
        context: &'static str,
        details: String,
    },
}

impl StoreError {
    pub fn status(&self) -> u16 {
        match self {
            StoreError::Forbidden => 403,
            StoreError::Conflict => 409,
            StoreError::NotFound => 404,
            StoreError::Unauthorized => 401,
            StoreError::Internal { .. } => 500,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            StoreError::Internal { details, .. } => Some(details.as_str()),
            _ => None,
        }
    }

    /// Adapter for `map_err` that downgrades a storage error to `Internal`.
    pub(crate) fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> StoreError {
        move |e| {
            error!("{}: {:#}", context, e);
            StoreError::Internal {
                context,
                details: format!("{:#}", e),
            }
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// Request body that could not be read or deserialized.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Store(e) => e.status(),
            ApiError::MissingField(_) | ApiError::BadRequest(_) => 400,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            status,
            error: self.to_string(),
            details: match &self {
                ApiError::Store(e) => e.details().map(str::to_string),
                ApiError::MissingField(_) | ApiError::BadRequest(_) => None,
            },
        };
        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, Json(body)).into_response()
    }
}
