// Library crate for the leaderboard service
// This file exposes the public API for integration tests

pub mod leaderboard;
pub mod ranking;
pub mod shared;

pub use shared::{AppError, AppState};

use axum::{
    routing::{get, post, put},
    Router,
};

/// Builds the full API router; shared by `main` and the integration tests
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/leaderboard", post(leaderboard::create_leaderboard))
        .route("/api/leaderboard/:id", get(ranking::get_leaderboard))
        .route(
            "/api/leaderboard/game/:game_id/player/:player_id",
            put(ranking::submit_score),
        )
        .route("/api/leaderboard/:id/top", get(ranking::get_top_n))
        .route(
            "/api/leaderboard/:id/player/:player_id/next",
            get(ranking::get_next_n),
        )
        .route(
            "/api/leaderboard/:id/player/:player_id/prev",
            get(ranking::get_prev_n),
        )
        .with_state(state)
}
