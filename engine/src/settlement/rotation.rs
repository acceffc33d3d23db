//! Rolling-priority (rotation) policy
//!
//! No bids: each claimant's *current* waiver rank decides the order, lowest
//! rank first. The first claimant that can legally receive the player wins
//! and is pushed to the back of the line (rank reassigned to one past the
//! current maximum across all teams); every other team's rank is unchanged,
//! so the league order stays total with no ties.
//!
//! Teams without a priority record cannot win through this policy and are
//! skipped outright.

use chrono::{DateTime, Utc};

use crate::models::claim::WaiverClaim;
use crate::models::settings::{PolicyKind, Tiebreaker};
use crate::rng::RngManager;
use crate::store::{LeagueStore, RosterMoveOutcome, StoreError};

use super::result::{PriorityUpdate, ProcessedClaim, SettlementResult};
use super::{order_claims, record_failure, record_roster_move, AllocationState, ClaimPolicy, FailureReason};

/// Rolling waiver priority
pub struct RotationPolicy;

impl ClaimPolicy for RotationPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Rotation
    }

    fn order_group(
        &self,
        claims: &mut [WaiverClaim],
        alloc: &AllocationState,
        tiebreaker: Tiebreaker,
        rng: &mut RngManager,
    ) {
        // Current rank, not the submission-time snapshot: a team that won
        // earlier in this run has already moved back in the order
        order_claims(
            claims,
            |c| alloc.priority_rank(c.team_id()),
            tiebreaker,
            rng,
        );
    }

    fn resolve_group(
        &self,
        claims: &mut [WaiverClaim],
        alloc: &mut AllocationState,
        store: &dyn LeagueStore,
        result: &mut SettlementResult,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        for claim in claims.iter_mut() {
            let Some(priority) = alloc.priority(claim.team_id()) else {
                // No rank in this league: cannot participate in rotation
                continue;
            };
            let team_name = priority.team_name().to_string();

            match store.try_roster_move(claim.team_id(), claim.player_id(), claim.drop_player_id())?
            {
                RosterMoveOutcome::Rejected(err) => {
                    record_failure(result, claim, FailureReason::from(&err), now);
                }
                RosterMoveOutcome::Applied => {
                    let Some((old_rank, new_rank)) = alloc.push_to_back(claim.team_id(), now)
                    else {
                        continue;
                    };

                    let _ = claim.mark_successful(now);
                    result.processed_claims.push(ProcessedClaim {
                        claim_id: claim.id().to_string(),
                        team_id: claim.team_id().to_string(),
                        player_id: claim.player_id().to_string(),
                        player_name: claim.player_name().to_string(),
                        drop_player_id: claim.drop_player_id().map(str::to_string),
                        drop_player_name: claim.drop_player_name().map(str::to_string),
                        bid_amount: None,
                        priority: Some(old_rank),
                    });
                    result.updated_priorities.push(PriorityUpdate {
                        team_id: claim.team_id().to_string(),
                        team_name,
                        old_rank,
                        new_rank,
                        reason: "Successful waiver claim - moved to back of line".to_string(),
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
