//! Reverse-standings policy
//!
//! Claims are ordered by current league standing, worst record first, using
//! the standings snapshot taken once when the run started, never re-queried
//! per player. Winner selection and failure semantics match rotation, but
//! nothing is mutated on success: standings move only when game results do,
//! outside this engine.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::models::claim::WaiverClaim;
use crate::models::settings::{PolicyKind, Tiebreaker};
use crate::rng::RngManager;
use crate::store::{LeagueStore, RosterMoveOutcome, StoreError};

use super::result::{ProcessedClaim, SettlementResult};
use super::{order_claims, record_failure, record_roster_move, AllocationState, ClaimPolicy, FailureReason};

/// Standings-based reverse order
pub struct ReverseStandingsPolicy;

impl ClaimPolicy for ReverseStandingsPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::ReverseStandings
    }

    fn order_group(
        &self,
        claims: &mut [WaiverClaim],
        alloc: &AllocationState,
        tiebreaker: Tiebreaker,
        rng: &mut RngManager,
    ) {
        // Higher standing number = worse record = earlier pick
        order_claims(
            claims,
            |c| Reverse(alloc.standing(c.team_id())),
            tiebreaker,
            rng,
        );
    }

    fn resolve_group(
        &self,
        claims: &mut [WaiverClaim],
        _alloc: &mut AllocationState,
        store: &dyn LeagueStore,
        result: &mut SettlementResult,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        for claim in claims.iter_mut() {
            match store.try_roster_move(claim.team_id(), claim.player_id(), claim.drop_player_id())?
            {
                RosterMoveOutcome::Rejected(err) => {
                    record_failure(result, claim, FailureReason::from(&err), now);
                }
                RosterMoveOutcome::Applied => {
                    let _ = claim.mark_successful(now);
                    result.processed_claims.push(ProcessedClaim {
                        claim_id: claim.id().to_string(),
                        team_id: claim.team_id().to_string(),
                        player_id: claim.player_id().to_string(),
                        player_name: claim.player_name().to_string(),
                        drop_player_id: claim.drop_player_id().map(str::to_string),
                        drop_player_name: claim.drop_player_name().map(str::to_string),
                        bid_amount: None,
                        priority: None,
                    });
                    record_roster_move(result, claim, 0);
                    result.stats.successful_claims += 1;

                    // Only one team can claim each player
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::Roster;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn claim_for(team: &str, secs: u32) -> WaiverClaim {
        let submitted = Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, secs).unwrap();
        let process_at = Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap();
        WaiverClaim::new("L1", team, "P1", "Player One", "RB", process_at, submitted)
    }

    fn alloc_with_standings(standings: &[(&str, u32)]) -> AllocationState {
        AllocationState::new(
            HashMap::new(),
            HashMap::new(),
            standings.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
        )
    }

    #[test]
    fn test_worst_record_picks_first() {
        let store = MemoryStore::new();
        store.put_roster(Roster::new("FIRST_PLACE", vec![], 15));
        store.put_roster(Roster::new("LAST_PLACE", vec![], 15));

        // Standing 1 = best record, standing 10 = worst
        let mut alloc = alloc_with_standings(&[("FIRST_PLACE", 1), ("LAST_PLACE", 10)]);
        let mut claims = vec![claim_for("FIRST_PLACE", 0), claim_for("LAST_PLACE", 1)];
        let mut result = SettlementResult::empty(2);
        let mut rng = RngManager::new(1);
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap();

        let policy = ReverseStandingsPolicy;
        policy.order_group(&mut claims, &alloc, Tiebreaker::SubmissionTime, &mut rng);
        policy
            .resolve_group(&mut claims, &mut alloc, &store, &mut result, now)
            .unwrap();

        assert_eq!(result.processed_claims[0].team_id, "LAST_PLACE");
    }

    #[test]
    fn test_no_allocation_state_is_mutated() {
        let store = MemoryStore::new();
        store.put_roster(Roster::new("T1", vec![], 15));

        let mut alloc = alloc_with_standings(&[("T1", 5)]);
        let budgets_before = alloc.budgets().clone();
        let mut claims = vec![claim_for("T1", 0)];
        let mut result = SettlementResult::empty(1);
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap();

        ReverseStandingsPolicy
            .resolve_group(&mut claims, &mut alloc, &store, &mut result, now)
            .unwrap();

        assert_eq!(result.processed_claims.len(), 1);
        assert_eq!(alloc.budgets(), &budgets_before);
        assert!(alloc.priorities().is_empty());
        assert_eq!(alloc.standing("T1"), 5);
    }
}
