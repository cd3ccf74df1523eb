use strum_macros::{Display, EnumIter};

use crate::leaderboard::models::LeaderboardModel;

/// Lifecycle phase of a leaderboard relative to its activation window.
/// Informational: the write filter only distinguishes Expired from the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum LeaderboardPhase {
    Pending,
    Active,
    Expired,
}

/// Whether the leaderboard currently accepts score submissions.
///
/// Only expiry blocks writes: a submission arriving before start_time is
/// accepted, so Pending and Active boards are indistinguishable here.
/// start_time marks the nominal activation only.
pub fn is_accepting_writes(leaderboard: &LeaderboardModel, now_millis: i64) -> bool {
    now_millis <= leaderboard.end_time
}

/// Where the leaderboard sits in its lifecycle at `now_millis`
pub fn phase(leaderboard: &LeaderboardModel, now_millis: i64) -> LeaderboardPhase {
    if now_millis < leaderboard.start_time {
        LeaderboardPhase::Pending
    } else if now_millis > leaderboard.end_time {
        LeaderboardPhase::Expired
    } else {
        LeaderboardPhase::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn board(start_time: i64, end_time: i64) -> LeaderboardModel {
        LeaderboardModel::new("game-1".to_string(), start_time, end_time)
    }

    /// A (leaderboard, now) fixture sitting in the given phase
    fn board_in_phase(phase: LeaderboardPhase) -> (LeaderboardModel, i64) {
        match phase {
            LeaderboardPhase::Pending => (board(1_000, 2_000), 500),
            LeaderboardPhase::Active => (board(1_000, 2_000), 1_500),
            LeaderboardPhase::Expired => (board(1_000, 2_000), 2_500),
        }
    }

    #[test]
    fn only_expired_blocks_writes() {
        for expected in LeaderboardPhase::iter() {
            let (leaderboard, now) = board_in_phase(expected);
            assert_eq!(phase(&leaderboard, now), expected);
            assert_eq!(
                is_accepting_writes(&leaderboard, now),
                expected != LeaderboardPhase::Expired,
                "phase {} write admission is wrong",
                expected
            );
        }
    }

    #[rstest]
    #[case(999, true)] // before nominal start: still writable
    #[case(1_000, true)]
    #[case(1_500, true)]
    #[case(2_000, true)] // boundary: end_time itself still admits writes
    #[case(2_001, false)]
    fn write_admission_depends_only_on_end_time(#[case] now: i64, #[case] accepting: bool) {
        let leaderboard = board(1_000, 2_000);
        assert_eq!(is_accepting_writes(&leaderboard, now), accepting);
    }

    #[rstest]
    #[case(500, LeaderboardPhase::Pending)]
    #[case(1_000, LeaderboardPhase::Active)]
    #[case(2_000, LeaderboardPhase::Active)]
    #[case(2_001, LeaderboardPhase::Expired)]
    fn phase_boundaries(#[case] now: i64, #[case] expected: LeaderboardPhase) {
        let leaderboard = board(1_000, 2_000);
        assert_eq!(phase(&leaderboard, now), expected);
    }
}
