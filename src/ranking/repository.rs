use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::index::RankedIndex;
use super::models::{EntryModel, UpsertOutcome};
use crate::shared::AppError;

/// Trait for ranked-entry operations against one leaderboard's index.
///
/// `upsert_if_higher` is the concurrency-critical operation: it must execute
/// as a single atomic conditional step per (leaderboard, player) key, so
/// concurrent callers observe a linear history of compare-and-replace steps
/// and never lose an update. The scan methods are bounded reads over the
/// (score desc, playerId asc) total order.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Atomic keep-the-max step: insert at version 1, update when strictly
    /// higher, otherwise ignore.
    async fn upsert_if_higher(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        new_score: i64,
    ) -> Result<UpsertOutcome, AppError>;

    async fn find_entry(
        &self,
        leaderboard_id: &str,
        player_id: &str,
    ) -> Result<Option<EntryModel>, AppError>;

    /// First `n` entries in rank order
    async fn find_top_n(&self, leaderboard_id: &str, n: usize)
        -> Result<Vec<EntryModel>, AppError>;

    /// Entries strictly after the anchor in rank order, already rank-ordered
    async fn find_next_n(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError>;

    /// Entries strictly before the anchor, scanned nearest-first (ascending
    /// score, descending playerId). Callers presenting rank order reverse
    /// the page afterwards.
    async fn find_prev_n_nearest_first(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError>;

    /// Every entry of the leaderboard in rank order
    async fn find_all_ranked(&self, leaderboard_id: &str) -> Result<Vec<EntryModel>, AppError>;
}

/// In-memory implementation of EntryRepository for development and testing.
///
/// One [`RankedIndex`] per leaderboard behind its own lock, so writes to one
/// leaderboard never serialize writes to another. The outer map lock is held
/// only long enough to look up or create a board's index.
pub struct InMemoryEntryRepository {
    boards: RwLock<HashMap<String, Arc<RwLock<RankedIndex>>>>,
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEntryRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            boards: RwLock::new(HashMap::new()),
        }
    }

    async fn board(&self, leaderboard_id: &str) -> Option<Arc<RwLock<RankedIndex>>> {
        let boards = self.boards.read().await;
        boards.get(leaderboard_id).cloned()
    }

    async fn board_or_create(&self, leaderboard_id: &str) -> Arc<RwLock<RankedIndex>> {
        let mut boards = self.boards.write().await;
        boards
            .entry(leaderboard_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(RankedIndex::new(leaderboard_id))))
            .clone()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    #[instrument(skip(self))]
    async fn upsert_if_higher(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        new_score: i64,
    ) -> Result<UpsertOutcome, AppError> {
        let board = self.board_or_create(leaderboard_id).await;

        // the whole compare-and-replace runs under this board's write lock
        let mut index = board.write().await;
        let outcome = index.upsert_if_higher(player_id, new_score);

        debug!(
            leaderboard_id = %leaderboard_id,
            player_id = %player_id,
            new_score,
            outcome = %outcome,
            "Applied score ratchet step"
        );
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn find_entry(
        &self,
        leaderboard_id: &str,
        player_id: &str,
    ) -> Result<Option<EntryModel>, AppError> {
        match self.board(leaderboard_id).await {
            Some(board) => Ok(board.read().await.find(player_id).cloned()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_top_n(
        &self,
        leaderboard_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        match self.board(leaderboard_id).await {
            Some(board) => Ok(board.read().await.top_n(n)),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self))]
    async fn find_next_n(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        match self.board(leaderboard_id).await {
            Some(board) => Ok(board
                .read()
                .await
                .neighbors_after(anchor_score, anchor_player_id, n)),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self))]
    async fn find_prev_n_nearest_first(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        match self.board(leaderboard_id).await {
            Some(board) => Ok(board
                .read()
                .await
                .neighbors_before(anchor_score, anchor_player_id, n)),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self))]
    async fn find_all_ranked(&self, leaderboard_id: &str) -> Result<Vec<EntryModel>, AppError> {
        match self.board(leaderboard_id).await {
            Some(board) => Ok(board.read().await.all_ranked()),
            None => Ok(Vec::new()),
        }
    }
}

/// PostgreSQL implementation of the entry repository.
/// Expects a `leaderboard_entries (leaderboard_id, player_id, score, version)`
/// table with a unique constraint on (leaderboard_id, player_id).
pub struct PostgresEntryRepository {
    pool: PgPool,
}

impl PostgresEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_if_higher(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        new_score: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE leaderboard_entries \
             SET score = $3, version = version + 1 \
             WHERE leaderboard_id = $1 AND player_id = $2 AND $3 > score",
        )
        .bind(leaderboard_id)
        .bind(player_id)
        .bind(new_score)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed conditional score update in database");
            AppError::Store(e.to_string())
        })?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    #[instrument(skip(self))]
    async fn upsert_if_higher(
        &self,
        leaderboard_id: &str,
        player_id: &str,
        new_score: i64,
    ) -> Result<UpsertOutcome, AppError> {
        // Guarded update first: `WHERE $new > score` makes the compare and
        // the write one atomic statement, so concurrent writers serialize on
        // the row instead of racing a read-then-write.
        if self
            .update_if_higher(leaderboard_id, player_id, new_score)
            .await?
        {
            return Ok(UpsertOutcome::Updated);
        }

        // No row updated: either the entry does not exist yet, or the stored
        // score is already >= new_score. Try to be the first writer.
        let inserted = sqlx::query(
            "INSERT INTO leaderboard_entries (leaderboard_id, player_id, score, version) \
             VALUES ($1, $2, $3, 1) \
             ON CONFLICT (leaderboard_id, player_id) DO NOTHING",
        )
        .bind(leaderboard_id)
        .bind(player_id)
        .bind(new_score)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed entry insert in database");
            AppError::Store(e.to_string())
        })?;

        if inserted.rows_affected() == 1 {
            return Ok(UpsertOutcome::Inserted);
        }

        // Unique-key conflict: a concurrent first writer beat us to the row.
        // Retry as an update; stored scores only grow, so a second miss
        // conclusively means new_score is not higher.
        if self
            .update_if_higher(leaderboard_id, player_id, new_score)
            .await?
        {
            Ok(UpsertOutcome::Updated)
        } else {
            Ok(UpsertOutcome::Ignored)
        }
    }

    #[instrument(skip(self))]
    async fn find_entry(
        &self,
        leaderboard_id: &str,
        player_id: &str,
    ) -> Result<Option<EntryModel>, AppError> {
        sqlx::query_as::<_, EntryModel>(
            "SELECT leaderboard_id, player_id, score, version \
             FROM leaderboard_entries \
             WHERE leaderboard_id = $1 AND player_id = $2",
        )
        .bind(leaderboard_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch entry from database");
            AppError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_top_n(
        &self,
        leaderboard_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        sqlx::query_as::<_, EntryModel>(
            "SELECT leaderboard_id, player_id, score, version \
             FROM leaderboard_entries \
             WHERE leaderboard_id = $1 \
             ORDER BY score DESC, player_id ASC \
             LIMIT $2",
        )
        .bind(leaderboard_id)
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch top entries from database");
            AppError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_next_n(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        sqlx::query_as::<_, EntryModel>(
            "SELECT leaderboard_id, player_id, score, version \
             FROM leaderboard_entries \
             WHERE leaderboard_id = $1 \
               AND (score < $2 OR (score = $2 AND player_id > $3)) \
             ORDER BY score DESC, player_id ASC \
             LIMIT $4",
        )
        .bind(leaderboard_id)
        .bind(anchor_score)
        .bind(anchor_player_id)
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch next entries from database");
            AppError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_prev_n_nearest_first(
        &self,
        leaderboard_id: &str,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Result<Vec<EntryModel>, AppError> {
        sqlx::query_as::<_, EntryModel>(
            "SELECT leaderboard_id, player_id, score, version \
             FROM leaderboard_entries \
             WHERE leaderboard_id = $1 \
               AND (score > $2 OR (score = $2 AND player_id < $3)) \
             ORDER BY score ASC, player_id DESC \
             LIMIT $4",
        )
        .bind(leaderboard_id)
        .bind(anchor_score)
        .bind(anchor_player_id)
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch previous entries from database");
            AppError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_all_ranked(&self, leaderboard_id: &str) -> Result<Vec<EntryModel>, AppError> {
        sqlx::query_as::<_, EntryModel>(
            "SELECT leaderboard_id, player_id, score, version \
             FROM leaderboard_entries \
             WHERE leaderboard_id = $1 \
             ORDER BY score DESC, player_id ASC",
        )
        .bind(leaderboard_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch leaderboard entries from database");
            AppError::Store(e.to_string())
        })
    }
}
