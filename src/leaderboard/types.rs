use serde::{Deserialize, Serialize};

/// Request payload for creating a new leaderboard
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaderboardRequest {
    pub game_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

/// Response for leaderboard creation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaderboardResponse {
    pub leaderboard_id: String,
}
