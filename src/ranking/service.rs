use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::EntryModel,
    repository::EntryRepository,
    score_limits,
    types::{GetLeaderboardResponse, PlayerScoreResponse, ScoreSubmissionResponse},
    window,
};
use crate::leaderboard::repository::LeaderboardRepository;
use crate::shared::AppError;

/// Service for score submission and rank-ordered queries
pub struct RankingService {
    leaderboard_repository: Arc<dyn LeaderboardRepository + Send + Sync>,
    entry_repository: Arc<dyn EntryRepository>,
}

impl RankingService {
    pub fn new(
        leaderboard_repository: Arc<dyn LeaderboardRepository + Send + Sync>,
        entry_repository: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            leaderboard_repository,
            entry_repository,
        }
    }

    /// Submits a score for a player across every leaderboard of a game.
    ///
    /// Expired leaderboards are skipped, not errors; each remaining
    /// leaderboard applies its keep-the-max step independently, so partial
    /// application across leaderboards is a normal outcome. The count only
    /// reflects leaderboards whose entry was actually inserted or updated.
    #[instrument(skip(self))]
    pub async fn submit_score(
        &self,
        game_id: &str,
        player_id: &str,
        new_score: i64,
    ) -> Result<ScoreSubmissionResponse, AppError> {
        validate_submit_score(game_id, player_id, new_score)?;

        let leaderboards = self.leaderboard_repository.find_by_game_id(game_id).await?;
        if leaderboards.is_empty() {
            return Err(AppError::NotFound(
                "No leaderboard found for given gameId.".to_string(),
            ));
        }

        let now = Utc::now().timestamp_millis();
        let mut accepting = Vec::new();
        for leaderboard in &leaderboards {
            if !window::is_accepting_writes(leaderboard, now) {
                warn!(
                    leaderboard_id = %leaderboard.id,
                    player_id = %player_id,
                    new_score,
                    "Leaderboard is expired, ignoring submission for it"
                );
                continue;
            }
            debug!(
                leaderboard_id = %leaderboard.id,
                phase = %window::phase(leaderboard, now),
                "Leaderboard accepts submission"
            );
            accepting.push(leaderboard.id.clone());
        }

        // fan the ratchet out; updates to distinct leaderboards are
        // independent and deliberately not atomic as a unit
        let updates = accepting.iter().map(|leaderboard_id| {
            self.entry_repository
                .upsert_if_higher(leaderboard_id, player_id, new_score)
        });

        let mut updated_count = 0;
        for outcome in join_all(updates).await {
            if outcome?.changed_data() {
                updated_count += 1;
            }
        }

        info!(
            game_id = %game_id,
            player_id = %player_id,
            updated_count,
            "Score submission processed"
        );

        Ok(ScoreSubmissionResponse {
            updated_leaderboard_count: updated_count,
            data_updated: updated_count != 0,
        })
    }

    /// Full leaderboard listing, highest rank first. Unbounded by design;
    /// the paginated queries are the growth-safe path.
    #[instrument(skip(self))]
    pub async fn get_leaderboard(
        &self,
        leaderboard_id: &str,
    ) -> Result<GetLeaderboardResponse, AppError> {
        validate_leaderboard_id(leaderboard_id)?;

        self.leaderboard_repository
            .find_by_id(leaderboard_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No leaderboard found for given id.".to_string()))?;

        let entries = self.entry_repository.find_all_ranked(leaderboard_id).await?;

        Ok(GetLeaderboardResponse {
            scores: entries.into_iter().map(PlayerScoreResponse::from).collect(),
        })
    }

    /// The `n` highest-ranked players of a leaderboard
    #[instrument(skip(self))]
    pub async fn get_top_n(
        &self,
        leaderboard_id: &str,
        n_players: i32,
    ) -> Result<Vec<PlayerScoreResponse>, AppError> {
        validate_leaderboard_id(leaderboard_id)?;
        let n = validate_n_players(n_players)?;

        let entries = self.entry_repository.find_top_n(leaderboard_id, n).await?;
        debug!(leaderboard_id = %leaderboard_id, count = entries.len(), "Top players fetched");

        Ok(entries.into_iter().map(PlayerScoreResponse::from).collect())
    }

    /// The `n` players ranked directly after the given player
    #[instrument(skip(self))]
    pub async fn get_next_n(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        n_players: i32,
    ) -> Result<Vec<PlayerScoreResponse>, AppError> {
        validate_leaderboard_id(leaderboard_id)?;
        validate_player_id(player_id)?;
        let n = validate_n_players(n_players)?;

        let anchor = self.player_entry(leaderboard_id, player_id).await?;
        let entries = self
            .entry_repository
            .find_next_n(leaderboard_id, anchor.score, &anchor.player_id, n)
            .await?;

        Ok(entries.into_iter().map(PlayerScoreResponse::from).collect())
    }

    /// The `n` players ranked directly before the given player, presented
    /// highest rank first like every other query
    #[instrument(skip(self))]
    pub async fn get_prev_n(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        n_players: i32,
    ) -> Result<Vec<PlayerScoreResponse>, AppError> {
        validate_leaderboard_id(leaderboard_id)?;
        validate_player_id(player_id)?;
        let n = validate_n_players(n_players)?;

        let anchor = self.player_entry(leaderboard_id, player_id).await?;
        let mut entries = self
            .entry_repository
            .find_prev_n_nearest_first(leaderboard_id, anchor.score, &anchor.player_id, n)
            .await?;

        // the scan returns nearest neighbors first (ascending score); flip
        // the page so output order matches the rank order of other queries
        entries.reverse();

        Ok(entries.into_iter().map(PlayerScoreResponse::from).collect())
    }

    async fn player_entry(
        &self,
        leaderboard_id: &str,
        player_id: &str,
    ) -> Result<EntryModel, AppError> {
        self.entry_repository
            .find_entry(leaderboard_id, player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found in leaderboard.".to_string()))
    }
}

fn validate_submit_score(game_id: &str, player_id: &str, new_score: i64) -> Result<(), AppError> {
    if game_id.is_empty() {
        return Err(AppError::Validation("GameId is invalid.".to_string()));
    }
    validate_player_id(player_id)?;
    if !(score_limits::LOWEST..=score_limits::HIGHEST).contains(&new_score) {
        return Err(AppError::Validation("Game score is invalid.".to_string()));
    }
    Ok(())
}

fn validate_leaderboard_id(leaderboard_id: &str) -> Result<(), AppError> {
    if leaderboard_id.is_empty() {
        return Err(AppError::Validation("LeaderboardId is invalid.".to_string()));
    }
    Ok(())
}

fn validate_player_id(player_id: &str) -> Result<(), AppError> {
    if player_id.is_empty() {
        return Err(AppError::Validation("PlayerId is invalid.".to_string()));
    }
    Ok(())
}

fn validate_n_players(n_players: i32) -> Result<usize, AppError> {
    if n_players < 0 {
        return Err(AppError::Validation("N count is invalid.".to_string()));
    }
    Ok(n_players as usize)
}
