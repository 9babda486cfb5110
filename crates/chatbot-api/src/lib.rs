pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod messages;
pub mod store;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tracing::error;

use chatbot_types::api::StatusResponse;

use crate::error::{ApiError, StoreError};
use crate::store::ChatStore;

pub type AppState = Arc<ChatStore>;

/// All chatbot routes, without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chatbot/register/", post(auth::register))
        .route("/api/chatbot/login/", post(auth::login))
        .route("/api/chatbot/upload/", post(messages::upload_message))
        .route("/api/chatbot/retrieve/", post(messages::list_messages))
        .route("/api/chatbot/delete/", post(messages::delete_chat))
        .route("/api/chatbot/rename/", post(messages::rename_chat))
        .with_state(state)
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::success())
}

pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value.ok_or(ApiError::MissingField(field))
}

/// Run a store call on the blocking pool.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StoreError::Internal {
                context: "Error handling request",
                details: e.to_string(),
            }
        })?
        .map_err(ApiError::from)
}
