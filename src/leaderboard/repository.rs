use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::LeaderboardModel;
use crate::shared::AppError;

/// Trait for leaderboard metadata operations. Leaderboards are created once
/// and immutable afterwards; the ranking engine only ever reads them.
#[async_trait]
pub trait LeaderboardRepository {
    async fn create(&self, leaderboard: &LeaderboardModel) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<LeaderboardModel>, AppError>;
    async fn find_by_game_id(&self, game_id: &str) -> Result<Vec<LeaderboardModel>, AppError>;
}

/// In-memory implementation of LeaderboardRepository for development and testing
pub struct InMemoryLeaderboardRepository {
    leaderboards: Mutex<HashMap<String, LeaderboardModel>>,
}

impl Default for InMemoryLeaderboardRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLeaderboardRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            leaderboards: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated leaderboards
    pub fn with_leaderboards(leaderboards: Vec<LeaderboardModel>) -> Self {
        let mut map = HashMap::new();
        for leaderboard in leaderboards {
            map.insert(leaderboard.id.clone(), leaderboard);
        }

        Self {
            leaderboards: Mutex::new(map),
        }
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryLeaderboardRepository {
    #[instrument(skip(self, leaderboard))]
    async fn create(&self, leaderboard: &LeaderboardModel) -> Result<(), AppError> {
        debug!(leaderboard_id = %leaderboard.id, game_id = %leaderboard.game_id, "Creating leaderboard in memory");

        let mut leaderboards = self.leaderboards.lock().unwrap();
        if leaderboards.contains_key(&leaderboard.id) {
            warn!(leaderboard_id = %leaderboard.id, "Leaderboard already exists in memory");
            return Err(AppError::Store("Leaderboard already exists".to_string()));
        }
        leaderboards.insert(leaderboard.id.clone(), leaderboard.clone());

        debug!(leaderboard_id = %leaderboard.id, "Leaderboard created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<LeaderboardModel>, AppError> {
        debug!(leaderboard_id = %id, "Fetching leaderboard from memory");

        let leaderboards = self.leaderboards.lock().unwrap();
        Ok(leaderboards.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_game_id(&self, game_id: &str) -> Result<Vec<LeaderboardModel>, AppError> {
        debug!(game_id = %game_id, "Fetching leaderboards for game from memory");

        let leaderboards = self.leaderboards.lock().unwrap();
        let matching = leaderboards
            .values()
            .filter(|l| l.game_id == game_id)
            .cloned()
            .collect();

        Ok(matching)
    }
}

/// PostgreSQL implementation of leaderboard repository.
/// Expects a `leaderboards (id, game_id, start_time, end_time)` table with
/// `id` as primary key and an index on `game_id`.
pub struct PostgresLeaderboardRepository {
    pool: PgPool,
}

impl PostgresLeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardRepository for PostgresLeaderboardRepository {
    #[instrument(skip(self, leaderboard))]
    async fn create(&self, leaderboard: &LeaderboardModel) -> Result<(), AppError> {
        debug!(leaderboard_id = %leaderboard.id, game_id = %leaderboard.game_id, "Creating leaderboard in database");

        sqlx::query(
            "INSERT INTO leaderboards (id, game_id, start_time, end_time) VALUES ($1, $2, $3, $4)",
        )
        .bind(&leaderboard.id)
        .bind(&leaderboard.game_id)
        .bind(leaderboard.start_time)
        .bind(leaderboard.end_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create leaderboard in database");
            AppError::Store(e.to_string())
        })?;

        debug!(leaderboard_id = %leaderboard.id, "Leaderboard created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<LeaderboardModel>, AppError> {
        debug!(leaderboard_id = %id, "Fetching leaderboard from database");

        sqlx::query_as::<_, LeaderboardModel>(
            "SELECT id, game_id, start_time, end_time FROM leaderboards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, leaderboard_id = %id, "Failed to fetch leaderboard from database");
            AppError::Store(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_game_id(&self, game_id: &str) -> Result<Vec<LeaderboardModel>, AppError> {
        debug!(game_id = %game_id, "Fetching leaderboards for game from database");

        sqlx::query_as::<_, LeaderboardModel>(
            "SELECT id, game_id, start_time, end_time FROM leaderboards WHERE game_id = $1",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to fetch leaderboards from database");
            AppError::Store(e.to_string())
        })
    }
}
