use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::leaderboard::repository::LeaderboardRepository;
use crate::ranking::repository::EntryRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub leaderboard_repository: Arc<dyn LeaderboardRepository + Send + Sync>,
    pub entry_repository: Arc<dyn EntryRepository>,
}

impl AppState {
    pub fn new(
        leaderboard_repository: Arc<dyn LeaderboardRepository + Send + Sync>,
        entry_repository: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            leaderboard_repository,
            entry_repository,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing-store read or conditional write failed. Retryable by the
    /// caller; the engine performs no retries of its own.
    #[error("Store error: {0}")]
    Store(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
