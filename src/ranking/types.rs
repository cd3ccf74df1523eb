use serde::{Deserialize, Serialize};

use super::models::EntryModel;

/// Response for a score submission fanned out across a game's leaderboards
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmissionResponse {
    pub updated_leaderboard_count: usize,
    pub data_updated: bool,
}

/// One (player, score) pair of a rank-ordered page
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreResponse {
    pub player_id: String,
    pub score: i64,
}

impl From<EntryModel> for PlayerScoreResponse {
    fn from(entry: EntryModel) -> Self {
        Self {
            player_id: entry.player_id,
            score: entry.score,
        }
    }
}

/// Full leaderboard listing, highest rank first
#[derive(Debug, Serialize, Deserialize)]
pub struct GetLeaderboardResponse {
    pub scores: Vec<PlayerScoreResponse>,
}

/// Query string for the paginated rank queries (top/next/prev)
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "nPlayers")]
    pub n_players: i32,
}

/// Query string for score submission
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    pub score: i64,
}
