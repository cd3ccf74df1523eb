// Public API - what other modules can use
pub use handlers::{get_leaderboard, get_next_n, get_prev_n, get_top_n, submit_score};
pub use models::UpsertOutcome;

// Internal modules
mod handlers;
pub mod index;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
pub mod window;

/// Accepted score range for submissions
pub mod score_limits {
    pub const LOWEST: i64 = 0;
    pub const HIGHEST: i64 = 1_000_000_000;
}
