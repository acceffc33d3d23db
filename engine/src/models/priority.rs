//! Waiver priority record (rotation policy)
//!
//! Each team in a rotation league holds one priority rank. Ranks form a
//! total order with no ties: lower rank = earlier pick. A team that wins
//! a claim is pushed to one past the worst rank, so the order stays total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One team's position in the rolling waiver order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiverPriority {
    /// Team this rank belongs to
    team_id: String,

    /// Display name, carried through to priority-update payloads
    team_name: String,

    /// Current rank (lower = earlier pick)
    rank: u32,

    /// When the team last won a claim
    last_successful_claim: Option<DateTime<Utc>>,

    /// Cumulative successful claims
    total_successful_claims: u32,
}

impl WaiverPriority {
    pub fn new(team_id: impl Into<String>, team_name: impl Into<String>, rank: u32) -> Self {
        Self {
            team_id: team_id.into(),
            team_name: team_name.into(),
            rank,
            last_successful_claim: None,
            total_successful_claims: 0,
        }
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn last_successful_claim(&self) -> Option<DateTime<Utc>> {
        self.last_successful_claim
    }

    pub fn total_successful_claims(&self) -> u32 {
        self.total_successful_claims
    }

    /// Record a won claim: move to `new_rank` and stamp the win
    ///
    /// Callers pass `max rank across the league + 1` so the winner lands
    /// strictly behind every other team.
    pub fn record_win(&mut self, new_rank: u32, now: DateTime<Utc>) {
        self.rank = new_rank;
        self.last_successful_claim = Some(now);
        self.total_successful_claims += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_win_updates_rank_and_count() {
        let mut priority = WaiverPriority::new("T1", "Team One", 1);
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap();

        priority.record_win(4, now);

        assert_eq!(priority.rank(), 4);
        assert_eq!(priority.last_successful_claim(), Some(now));
        assert_eq!(priority.total_successful_claims(), 1);
    }
}
