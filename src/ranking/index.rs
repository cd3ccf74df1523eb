use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use super::models::{EntryKey, EntryModel, UpsertOutcome};

/// Authoritative ordering for one leaderboard.
///
/// Entries live in a `BTreeMap` keyed by [`EntryKey`], so an in-order walk
/// yields rank 1, 2, 3, ... directly (score descending, playerId ascending).
/// A secondary map by playerId backs point lookups and the keep-the-max
/// update without scanning.
#[derive(Debug)]
pub struct RankedIndex {
    leaderboard_id: String,
    order: BTreeMap<EntryKey, EntryModel>,
    scores: HashMap<String, EntryKey>, // playerId -> current rank key
}

impl RankedIndex {
    pub fn new(leaderboard_id: &str) -> Self {
        Self {
            leaderboard_id: leaderboard_id.to_string(),
            order: BTreeMap::new(),
            scores: HashMap::new(),
        }
    }

    /// Applies one keep-the-max step for a player.
    ///
    /// Creates the entry at version 1 when the player is new; replaces the
    /// score, bumps the version and repositions the entry when the submitted
    /// score is strictly higher; leaves everything untouched otherwise.
    pub fn upsert_if_higher(&mut self, player_id: &str, new_score: i64) -> UpsertOutcome {
        match self.scores.get(player_id).cloned() {
            None => {
                let entry = EntryModel {
                    leaderboard_id: self.leaderboard_id.clone(),
                    player_id: player_id.to_string(),
                    score: new_score,
                    version: 1,
                };
                self.scores.insert(player_id.to_string(), entry.key());
                self.order.insert(entry.key(), entry);
                UpsertOutcome::Inserted
            }
            Some(current_key) if new_score > current_key.score => {
                let mut entry = match self.order.remove(&current_key) {
                    Some(entry) => entry,
                    // scores and order are updated together; a missing entry
                    // here would mean the index itself is corrupt
                    None => unreachable!("entry present in scores but missing from order"),
                };
                entry.score = new_score;
                entry.version += 1;
                self.scores.insert(player_id.to_string(), entry.key());
                self.order.insert(entry.key(), entry);
                UpsertOutcome::Updated
            }
            Some(_) => UpsertOutcome::Ignored,
        }
    }

    /// Current entry for a player, if any
    pub fn find(&self, player_id: &str) -> Option<&EntryModel> {
        self.scores.get(player_id).and_then(|key| self.order.get(key))
    }

    /// The first `n` entries in rank order. Fewer than `n` entries yields
    /// all of them; `n == 0` yields an empty sequence.
    pub fn top_n(&self, n: usize) -> Vec<EntryModel> {
        self.order.values().take(n).cloned().collect()
    }

    /// Entries strictly after the anchor in rank order (lower score, or same
    /// score with a greater playerId), already in final rank order,
    /// truncated to `n`.
    pub fn neighbors_after(
        &self,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Vec<EntryModel> {
        let anchor = EntryKey {
            score: anchor_score,
            player_id: anchor_player_id.to_string(),
        };
        self.order
            .range((Bound::Excluded(anchor), Bound::Unbounded))
            .take(n)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Entries strictly before the anchor in rank order, scanned
    /// nearest-first (ascending score, then descending playerId) and
    /// truncated to `n`.
    ///
    /// The result is in scan order, NOT presentation order: callers that
    /// present rank-ordered pages reverse it afterwards. Keeping the
    /// reversal out of the scan keeps both directions symmetric.
    pub fn neighbors_before(
        &self,
        anchor_score: i64,
        anchor_player_id: &str,
        n: usize,
    ) -> Vec<EntryModel> {
        let anchor = EntryKey {
            score: anchor_score,
            player_id: anchor_player_id.to_string(),
        };
        self.order
            .range((Bound::Unbounded, Bound::Excluded(anchor)))
            .rev()
            .take(n)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Every entry in rank order
    pub fn all_ranked(&self) -> Vec<EntryModel> {
        self.order.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(entries: &[(&str, i64)]) -> RankedIndex {
        let mut index = RankedIndex::new("lb1");
        for (player_id, score) in entries {
            index.upsert_if_higher(player_id, *score);
        }
        index
    }

    fn players(entries: &[EntryModel]) -> Vec<&str> {
        entries.iter().map(|e| e.player_id.as_str()).collect()
    }

    #[test]
    fn first_submission_inserts_at_version_one() {
        let mut index = RankedIndex::new("lb1");

        let outcome = index.upsert_if_higher("p1", 100);

        assert_eq!(outcome, UpsertOutcome::Inserted);
        let entry = index.find("p1").unwrap();
        assert_eq!(entry.score, 100);
        assert_eq!(entry.version, 1);
        assert_eq!(entry.leaderboard_id, "lb1");
    }

    #[test]
    fn higher_score_updates_and_bumps_version() {
        let mut index = index_with(&[("p1", 100)]);

        let outcome = index.upsert_if_higher("p1", 150);

        assert_eq!(outcome, UpsertOutcome::Updated);
        let entry = index.find("p1").unwrap();
        assert_eq!(entry.score, 150);
        assert_eq!(entry.version, 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn lower_or_equal_score_is_ignored() {
        let mut index = index_with(&[("p1", 100)]);

        assert_eq!(index.upsert_if_higher("p1", 100), UpsertOutcome::Ignored);
        assert_eq!(index.upsert_if_higher("p1", 50), UpsertOutcome::Ignored);

        let entry = index.find("p1").unwrap();
        assert_eq!(entry.score, 100);
        assert_eq!(entry.version, 1);
    }

    #[test]
    fn stored_score_is_maximum_of_all_submissions() {
        let mut index = RankedIndex::new("lb1");
        for score in [40, 10, 90, 90, 20, 70] {
            index.upsert_if_higher("p1", score);
        }

        assert_eq!(index.find("p1").unwrap().score, 90);
    }

    #[test]
    fn update_repositions_entry_in_rank_order() {
        let mut index = index_with(&[("p1", 100), ("p2", 90), ("p3", 80)]);

        index.upsert_if_higher("p3", 95);

        assert_eq!(players(&index.top_n(3)), vec!["p1", "p3", "p2"]);
    }

    #[test]
    fn top_n_is_sorted_for_every_prefix_length() {
        let index = index_with(&[
            ("p4", 70),
            ("p1", 100),
            ("p5", 90),
            ("p3", 80),
            ("p2", 90),
        ]);

        let full = index.top_n(index.len());
        for n in 0..=index.len() {
            assert_eq!(index.top_n(n), full[..n].to_vec());
        }

        // score desc, ties (p2/p5 at 90) by playerId asc
        assert_eq!(players(&full), vec!["p1", "p2", "p5", "p3", "p4"]);
    }

    #[test]
    fn top_n_with_zero_or_excess_n() {
        let index = index_with(&[("p1", 100), ("p2", 90)]);

        assert!(index.top_n(0).is_empty());
        assert_eq!(index.top_n(10).len(), 2);
    }

    #[test]
    fn find_missing_player_returns_none() {
        let index = index_with(&[("p1", 100)]);
        assert!(index.find("p404").is_none());
    }

    #[test]
    fn neighbors_after_returns_next_ranks_in_order() {
        let index = index_with(&[("p1", 100), ("p2", 95), ("p3", 80)]);

        let after = index.neighbors_after(100, "p1", 2);
        assert_eq!(players(&after), vec!["p2", "p3"]);
        assert_eq!(after[0].score, 95);
        assert_eq!(after[1].score, 80);
    }

    #[test]
    fn neighbors_after_includes_tied_players_with_greater_id() {
        let index = index_with(&[("p1", 90), ("p2", 90), ("p3", 90)]);

        assert_eq!(players(&index.neighbors_after(90, "p1", 5)), vec!["p2", "p3"]);
        assert_eq!(players(&index.neighbors_after(90, "p2", 5)), vec!["p3"]);
        assert!(index.neighbors_after(90, "p3", 5).is_empty());
    }

    #[test]
    fn neighbors_before_scans_nearest_first() {
        let index = index_with(&[("p1", 100), ("p2", 95), ("p3", 80), ("p4", 70)]);

        // nearest ranks above p4 come back first: p3, then p2, then p1
        let before = index.neighbors_before(70, "p4", 3);
        assert_eq!(players(&before), vec!["p3", "p2", "p1"]);
    }

    #[test]
    fn neighbors_before_includes_tied_players_with_smaller_id() {
        let index = index_with(&[("p1", 90), ("p2", 90), ("p3", 90)]);

        assert_eq!(players(&index.neighbors_before(90, "p3", 5)), vec!["p2", "p1"]);
        assert!(index.neighbors_before(90, "p1", 5).is_empty());
    }

    #[test]
    fn neighbors_truncate_to_n() {
        let index = index_with(&[("p1", 100), ("p2", 90), ("p3", 80), ("p4", 70)]);

        assert_eq!(index.neighbors_after(100, "p1", 2).len(), 2);
        assert_eq!(index.neighbors_before(70, "p4", 2).len(), 2);
        assert!(index.neighbors_after(100, "p1", 0).is_empty());
    }

    #[test]
    fn paging_forward_partitions_the_full_order() {
        let index = index_with(&[
            ("p1", 100),
            ("p2", 90),
            ("p3", 90),
            ("p4", 80),
            ("p5", 70),
            ("p6", 60),
            ("p7", 50),
        ]);

        // walk pages of 2 from rank 1; concatenation must reproduce the
        // full order with no gaps or duplicates
        let mut paged: Vec<EntryModel> = index.top_n(2);
        loop {
            let last = match paged.last() {
                Some(entry) => entry.clone(),
                None => break,
            };
            let page = index.neighbors_after(last.score, &last.player_id, 2);
            if page.is_empty() {
                break;
            }
            paged.extend(page);
        }

        assert_eq!(paged, index.all_ranked());
    }

    #[test]
    fn backward_page_reversed_equals_rank_slice_above_anchor() {
        let index = index_with(&[
            ("p1", 100),
            ("p2", 90),
            ("p3", 85),
            ("p4", 80),
            ("p5", 70),
        ]);
        let full = index.all_ranked();

        // anchor p4 sits at rank 4 (0-based index 3); the two entries above
        // it are ranks 2..=3
        let mut page = index.neighbors_before(80, "p4", 2);
        page.reverse();
        assert_eq!(page, full[1..3].to_vec());

        // asking for more than exist clips at rank 1
        let mut page = index.neighbors_before(80, "p4", 10);
        page.reverse();
        assert_eq!(page, full[..3].to_vec());
    }

    #[test]
    fn empty_index_answers_empty() {
        let index = RankedIndex::new("lb1");

        assert!(index.is_empty());
        assert!(index.top_n(5).is_empty());
        assert!(index.all_ranked().is_empty());
        assert!(index.neighbors_after(100, "p1", 5).is_empty());
        assert!(index.neighbors_before(100, "p1", 5).is_empty());
    }

    #[test]
    fn indexes_for_different_leaderboards_are_independent() {
        let mut a = RankedIndex::new("lb-a");
        let mut b = RankedIndex::new("lb-b");

        a.upsert_if_higher("p1", 100);
        b.upsert_if_higher("p1", 50);

        assert_eq!(a.find("p1").unwrap().score, 100);
        assert_eq!(b.find("p1").unwrap().score, 50);
    }
}
