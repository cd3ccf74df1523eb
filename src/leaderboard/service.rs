use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::LeaderboardModel,
    repository::LeaderboardRepository,
    types::{CreateLeaderboardRequest, CreateLeaderboardResponse},
};
use crate::shared::AppError;

/// Service for handling leaderboard metadata business logic
pub struct LeaderboardService {
    repository: Arc<dyn LeaderboardRepository + Send + Sync>,
}

impl LeaderboardService {
    pub fn new(repository: Arc<dyn LeaderboardRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a new leaderboard with a generated ID
    #[instrument(skip(self))]
    pub async fn create_leaderboard(
        &self,
        request: CreateLeaderboardRequest,
    ) -> Result<CreateLeaderboardResponse, AppError> {
        validate_create_leaderboard(&request)?;

        let leaderboard =
            LeaderboardModel::new(request.game_id, request.start_time, request.end_time);
        debug!(leaderboard_id = %leaderboard.id, "Generated leaderboard ID");

        self.repository.create(&leaderboard).await?;

        info!(
            leaderboard_id = %leaderboard.id,
            game_id = %leaderboard.game_id,
            "Leaderboard created successfully"
        );

        Ok(CreateLeaderboardResponse {
            leaderboard_id: leaderboard.id,
        })
    }
}

fn validate_create_leaderboard(request: &CreateLeaderboardRequest) -> Result<(), AppError> {
    if request.game_id.is_empty() {
        return Err(AppError::Validation("GameId is invalid.".to_string()));
    }
    if request.start_time >= request.end_time {
        return Err(AppError::Validation(
            "Leaderboard startTime must be earlier than endTime.".to_string(),
        ));
    }
    Ok(())
}
