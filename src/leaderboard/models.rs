use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the leaderboards table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LeaderboardModel {
    pub id: String,      // Generated UUID
    pub game_id: String, // Game this leaderboard is linked to
    pub start_time: i64, // Nominal activation time, epoch millis
    pub end_time: i64,   // Submissions are rejected after this, epoch millis
}

impl LeaderboardModel {
    /// Creates a new leaderboard model with a generated ID
    pub fn new(game_id: String, start_time: i64, end_time: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game_id,
            start_time,
            end_time,
        }
    }
}
