use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{service::LeaderboardService, types::CreateLeaderboardRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new leaderboard
///
/// POST /api/leaderboard
/// Returns 201 with the generated leaderboard ID
#[instrument(name = "create_leaderboard", skip(state))]
pub async fn create_leaderboard(
    State(state): State<AppState>,
    Json(request): Json<CreateLeaderboardRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(game_id = %request.game_id, "Creating new leaderboard");

    let service = LeaderboardService::new(Arc::clone(&state.leaderboard_repository));
    let response = service.create_leaderboard(request).await?;

    info!(leaderboard_id = %response.leaderboard_id, "Leaderboard created successfully");

    Ok((StatusCode::CREATED, Json(response)))
}
