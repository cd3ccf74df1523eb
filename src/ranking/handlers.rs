use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::RankingService,
    types::{
        GetLeaderboardResponse, PageQuery, PlayerScoreResponse, ScoreQuery,
        ScoreSubmissionResponse,
    },
};
use crate::shared::{AppError, AppState};

fn ranking_service(state: &AppState) -> RankingService {
    RankingService::new(
        Arc::clone(&state.leaderboard_repository),
        Arc::clone(&state.entry_repository),
    )
}

/// HTTP handler for submitting a score to every leaderboard of a game
///
/// PUT /api/leaderboard/game/:game_id/player/:player_id?score=
#[instrument(name = "submit_score", skip(state))]
pub async fn submit_score(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, String)>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<ScoreSubmissionResponse>, AppError> {
    info!(game_id = %game_id, player_id = %player_id, score = query.score, "Submitting score");

    let response = ranking_service(&state)
        .submit_score(&game_id, &player_id, query.score)
        .await?;

    info!(
        updated_leaderboard_count = response.updated_leaderboard_count,
        "Score submission handled"
    );

    Ok(Json(response))
}

/// HTTP handler for the full leaderboard listing
///
/// GET /api/leaderboard/:id
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(leaderboard_id): Path<String>,
) -> Result<Json<GetLeaderboardResponse>, AppError> {
    let response = ranking_service(&state)
        .get_leaderboard(&leaderboard_id)
        .await?;

    info!(
        leaderboard_id = %leaderboard_id,
        entry_count = response.scores.len(),
        "Leaderboard listed"
    );

    Ok(Json(response))
}

/// HTTP handler for the top N players of a leaderboard
///
/// GET /api/leaderboard/:id/top?nPlayers=
#[instrument(name = "get_top_n", skip(state))]
pub async fn get_top_n(
    State(state): State<AppState>,
    Path(leaderboard_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<PlayerScoreResponse>>, AppError> {
    let players = ranking_service(&state)
        .get_top_n(&leaderboard_id, query.n_players)
        .await?;

    Ok(Json(players))
}

/// HTTP handler for the N players ranked after a given player
///
/// GET /api/leaderboard/:id/player/:player_id/next?nPlayers=
#[instrument(name = "get_next_n", skip(state))]
pub async fn get_next_n(
    State(state): State<AppState>,
    Path((leaderboard_id, player_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<PlayerScoreResponse>>, AppError> {
    let players = ranking_service(&state)
        .get_next_n(&leaderboard_id, &player_id, query.n_players)
        .await?;

    Ok(Json(players))
}

/// HTTP handler for the N players ranked before a given player
///
/// GET /api/leaderboard/:id/player/:player_id/prev?nPlayers=
#[instrument(name = "get_prev_n", skip(state))]
pub async fn get_prev_n(
    State(state): State<AppState>,
    Path((leaderboard_id, player_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<PlayerScoreResponse>>, AppError> {
    let players = ranking_service(&state)
        .get_prev_n(&leaderboard_id, &player_id, query.n_players)
        .await?;

    Ok(Json(players))
}
