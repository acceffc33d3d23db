//! FAAB auction policy
//!
//! Claims are ordered by sealed bid, highest first, with the league's
//! configured tiebreaker. Walking the order, a claim fails outright when
//! its bid exceeds the team's *current* remaining budget (which may have
//! shrunk from a win earlier in the same run) or when the team has no
//! roster room and named no drop. The first claim that clears both gates
//! wins: the exact bid is debited and no later claim for the player is
//! considered.
//!
//! A winning bid of 0 is legal when the league allows zero bids; that rule
//! is enforced at submission, so by settlement time every stored bid is
//! valid in shape and only budget and roster state can reject it.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::models::claim::WaiverClaim;
use crate::models::settings::{PolicyKind, Tiebreaker};
use crate::rng::RngManager;
use crate::store::{LeagueStore, RosterMoveOutcome, StoreError};

use super::result::{BudgetUpdate, ProcessedClaim, SettlementResult};
use super::{
    order_claims, record_failure, record_roster_move, AllocationState, ClaimPolicy, FailureReason,
};

/// Free-Agent Acquisition Budget auction
pub struct AuctionPolicy;

impl ClaimPolicy for AuctionPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Auction
    }

    fn order_group(
        &self,
        claims: &mut [WaiverClaim],
        _alloc: &AllocationState,
        tiebreaker: Tiebreaker,
        rng: &mut RngManager,
    ) {
        // Highest bid first; a missing bid competes as 0
        order_claims(
            claims,
            |c| Reverse(c.bid_amount().unwrap_or(0)),
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
            let bid = claim.bid_amount().unwrap_or(0);

            // Hard budget check against the run's live budget state
            if bid > alloc.budget(claim.team_id()) {
                record_failure(result, claim, FailureReason::InsufficientBudget, now);
                continue;
            }

            match store.try_roster_move(claim.team_id(), claim.player_id(), claim.drop_player_id())?
            {
                RosterMoveOutcome::Rejected(err) => {
                    record_failure(result, claim, FailureReason::from(&err), now);
                }
                RosterMoveOutcome::Applied => {
                    let Some((old_budget, new_budget)) = alloc.debit(claim.team_id(), bid) else {
                        // Budget was checked above; only a malformed negative
                        // bid can land here
                        record_failure(result, claim, FailureReason::InsufficientBudget, now);
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
                        bid_amount: Some(bid),
                        priority: None,
                    });
                    result.budget_updates.push(BudgetUpdate {
                        team_id: claim.team_id().to_string(),
                        old_budget,
                        new_budget,
                        amount_spent: bid,
                    });
                    record_roster_move(result, claim, bid);
                    result.stats.successful_claims += 1;
                    result.stats.total_faab_spent += bid;

                    // Only one team can claim each player
                    break;
                }
            }
        }
        Ok(())
    }
}
