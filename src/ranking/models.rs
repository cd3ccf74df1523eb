use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use strum_macros::Display;

/// Database model for the leaderboard_entries table.
///
/// A player's best recorded score within one leaderboard, unique per
/// (leaderboard_id, player_id). The owning leaderboard is held by id only;
/// entries never reference leaderboard metadata directly.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EntryModel {
    pub leaderboard_id: String,
    pub player_id: String,
    pub score: i64,
    /// Starts at 1 on creation and increments exactly once per successful
    /// score increase; never decremented.
    pub version: i64,
}

impl EntryModel {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            score: self.score,
            player_id: self.player_id.clone(),
        }
    }
}

/// Composite rank key for one entry.
///
/// The total order is score descending, ties broken by playerId ascending.
/// Since playerId is unique per leaderboard, no two distinct entries ever
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey {
    pub score: i64,
    pub player_id: String,
}

impl Ord for EntryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.player_id.cmp(&other.player_id))
    }
}

impl PartialOrd for EntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of one keep-the-max step against a single (leaderboard, player) key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UpsertOutcome {
    /// No entry existed; one was created at version 1
    Inserted,
    /// The submitted score beat the stored one; score replaced, version bumped
    Updated,
    /// The submitted score did not beat the stored one; nothing changed
    Ignored,
}

impl UpsertOutcome {
    /// True for the outcomes that mutated the index
    pub fn changed_data(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted | UpsertOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(score: i64, player_id: &str) -> EntryKey {
        EntryKey {
            score,
            player_id: player_id.to_string(),
        }
    }

    #[test]
    fn higher_score_ranks_first() {
        assert!(key(100, "p1") < key(90, "p2"));
        assert!(key(90, "p2") > key(100, "p1"));
    }

    #[test]
    fn ties_break_by_player_id_ascending() {
        assert!(key(100, "alice") < key(100, "bob"));
        assert!(key(100, "p1") < key(100, "p2"));
    }

    #[test]
    fn equal_only_for_identical_pairs() {
        assert_eq!(key(100, "p1"), key(100, "p1"));
        assert_ne!(key(100, "p1"), key(100, "p2"));
        assert_ne!(key(100, "p1"), key(99, "p1"));
    }

    #[test]
    fn outcome_reports_data_changes() {
        assert!(UpsertOutcome::Inserted.changed_data());
        assert!(UpsertOutcome::Updated.changed_data());
        assert!(!UpsertOutcome::Ignored.changed_data());
    }
}
