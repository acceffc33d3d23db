//! Settlement policies
//!
//! This module defines the policy interface for resolving competing waiver
//! claims on the same player.
//!
//! # Overview
//!
//! Every scheduled run partitions the league's pending claims by contested
//! player, orders each group with the active policy's comparator, then
//! walks the group in order and awards the player to the **first** claim
//! whose team can legally receive it. At most one claim per player succeeds
//! per run.
//!
//! Three interchangeable policies implement the shared contract:
//! 1. **Auction** (FAAB): highest sealed bid wins, budget debited
//! 2. **Rotation** (rolling priority): lowest rank wins, winner pushed back
//! 3. **ReverseStandings**: worst record wins, nothing mutated
//!
//! # Critical Invariants
//!
//! 1. Group order is total: after the primary key and the configured
//!    tiebreaker, remaining ties fall back to submission time then claim id
//! 2. Allocation mutations made while resolving one player are visible to
//!    the next player in the same run (sequential, not snapshot-isolated)
//! 3. Budgets never go negative; a debit is exactly the winning bid

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::claim::WaiverClaim;
use crate::models::priority::WaiverPriority;
use crate::models::roster::RosterError;
use crate::models::settings::{PolicyKind, Tiebreaker};
use crate::rng::RngManager;
use crate::store::{LeagueStore, StoreError};

pub mod auction;
pub mod group;
pub mod result;
pub mod reverse;
pub mod rotation;

pub use auction::AuctionPolicy;
pub use group::group_by_player;
pub use result::{
    BudgetUpdate, FailedClaim, PriorityUpdate, ProcessedClaim, ProcessingStats, RosterMove,
    SettlementResult,
};
pub use reverse::ReverseStandingsPolicy;
pub use rotation::RotationPolicy;

/// Why a claim was rejected during settlement
///
/// These are expected, frequent outcomes recorded on the claim itself,
/// not system errors. Claims that merely lost the player to an earlier
/// claim in the order carry no reason at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Auction only: bid exceeds the team's remaining budget at settlement
    InsufficientBudget,

    /// Roster is full and the claim named no drop player
    NoRosterSpace,

    /// The named drop player is no longer on the roster
    DropPlayerNotOnRoster,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InsufficientBudget => write!(f, "Insufficient FAAB budget"),
            FailureReason::NoRosterSpace => {
                write!(f, "No roster space and no drop player specified")
            }
            FailureReason::DropPlayerNotOnRoster => {
                write!(f, "Drop player is no longer on the roster")
            }
        }
    }
}

impl From<&RosterError> for FailureReason {
    fn from(err: &RosterError) -> Self {
        match err {
            RosterError::NoSpace => FailureReason::NoRosterSpace,
            RosterError::DropPlayerNotOnRoster { .. } => FailureReason::DropPlayerNotOnRoster,
        }
    }
}

/// Mutable allocation state for one settlement run
///
/// Snapshot of budgets, priorities, and standings taken once when the run
/// starts. Policies mutate it claim by claim; the deltas are what get
/// persisted back through the store at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    budgets: HashMap<String, i64>,
    priorities: HashMap<String, WaiverPriority>,
    standings: HashMap<String, u32>,
}

impl AllocationState {
    pub fn new(
        budgets: HashMap<String, i64>,
        priorities: HashMap<String, WaiverPriority>,
        standings: HashMap<String, u32>,
    ) -> Self {
        Self {
            budgets,
            priorities,
            standings,
        }
    }

    /// Remaining FAAB budget for a team (teams without a record have 0)
    pub fn budget(&self, team_id: &str) -> i64 {
        self.budgets.get(team_id).copied().unwrap_or(0)
    }

    /// Debit a winning bid from a team's budget
    ///
    /// Returns `(old_budget, new_budget)`, or `None` if the debit would
    /// drive the budget negative (in which case nothing changes).
    pub fn debit(&mut self, team_id: &str, amount: i64) -> Option<(i64, i64)> {
        let old = self.budget(team_id);
        if amount < 0 || amount > old {
            return None;
        }
        let new = old - amount;
        self.budgets.insert(team_id.to_string(), new);
        Some((old, new))
    }

    pub fn priority(&self, team_id: &str) -> Option<&WaiverPriority> {
        self.priorities.get(team_id)
    }

    /// Current rank for ordering; teams without a record sort last
    pub fn priority_rank(&self, team_id: &str) -> u32 {
        self.priorities
            .get(team_id)
            .map(|p| p.rank())
            .unwrap_or(u32::MAX)
    }

    /// Push a winning team to the back of the waiver order
    ///
    /// The new rank is one past the current maximum across all teams, so
    /// ranks stay pairwise distinct. Returns `(old_rank, new_rank)`, or
    /// `None` if the team has no priority record.
    pub fn push_to_back(&mut self, team_id: &str, now: DateTime<Utc>) -> Option<(u32, u32)> {
        if !self.priorities.contains_key(team_id) {
            return None;
        }
        let max_rank = self.priorities.values().map(|p| p.rank()).max().unwrap_or(0);
        let new_rank = max_rank + 1;
        let entry = self.priorities.get_mut(team_id)?;
        let old_rank = entry.rank();
        entry.record_win(new_rank, now);
        Some((old_rank, new_rank))
    }

    /// Standings position for ordering (higher = worse record).
    /// Teams without a standing sort as if they had the worst record.
    pub fn standing(&self, team_id: &str) -> u32 {
        self.standings.get(team_id).copied().unwrap_or(u32::MAX)
    }

    pub fn budgets(&self) -> &HashMap<String, i64> {
        &self.budgets
    }

    pub fn priorities(&self) -> &HashMap<String, WaiverPriority> {
        &self.priorities
    }
}

/// A settlement policy: orders a claim group, then awards the player
///
/// Shared contract: sorted claims in, winners and failures out. Each call
/// to [`ClaimPolicy::resolve_group`] handles all claims for exactly one
/// player and marks every claim it reaches with a terminal outcome
/// decision; claims after the first winner stay pending and are marked
/// lost by the engine.
pub trait ClaimPolicy {
    fn kind(&self) -> PolicyKind;

    /// Order one player's claim group into the total settlement order
    fn order_group(
        &self,
        claims: &mut [WaiverClaim],
        alloc: &AllocationState,
        tiebreaker: Tiebreaker,
        rng: &mut RngManager,
    );

    /// Walk an ordered group and award the player to the first legal claim
    ///
    /// Mutates claim statuses in place and accumulates winners, failures,
    /// budget/priority deltas, and roster moves onto `result`. Store
    /// errors abort the run; claim rejections never do.
    fn resolve_group(
        &self,
        claims: &mut [WaiverClaim],
        alloc: &mut AllocationState,
        store: &dyn LeagueStore,
        result: &mut SettlementResult,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Look up the policy implementation for a configured kind
pub fn policy_for(kind: PolicyKind) -> Box<dyn ClaimPolicy> {
    match kind {
        PolicyKind::Auction => Box::new(AuctionPolicy),
        PolicyKind::Rotation => Box::new(RotationPolicy),
        PolicyKind::ReverseStandings => Box::new(ReverseStandingsPolicy),
    }
}

/// Sort a claim group by a primary key plus the configured tiebreaker
///
/// `primary` must yield ascending settlement order (wrap in
/// `std::cmp::Reverse` for descending criteria like bid amount).
///
/// The `random` tiebreak shuffles first and then stable-sorts on the
/// primary key alone, leaving tied claims in uniformly random relative
/// order. The other tiebreaks end with submission time and claim id so
/// the order is always total.
pub(crate) fn order_claims<K, F>(
    claims: &mut [WaiverClaim],
    primary: F,
    tiebreaker: Tiebreaker,
    rng: &mut RngManager,
) where
    K: Ord,
    F: Fn(&WaiverClaim) -> K,
{
    match tiebreaker {
        Tiebreaker::Random => {
            rng.shuffle(claims);
            // Stable sort preserves the shuffled order among ties
            claims.sort_by(|a, b| primary(a).cmp(&primary(b)));
        }
        Tiebreaker::Priority => {
            claims.sort_by(|a, b| {
                primary(a)
                    .cmp(&primary(b))
                    .then_with(|| {
                        a.priority()
                            .unwrap_or(u32::MAX)
                            .cmp(&b.priority().unwrap_or(u32::MAX))
                    })
                    .then_with(|| a.submitted_at().cmp(&b.submitted_at()))
                    .then_with(|| a.id().cmp(b.id()))
            });
        }
        Tiebreaker::SubmissionTime => {
            claims.sort_by(|a, b| {
                primary(a)
                    .cmp(&primary(b))
                    .then_with(|| a.submitted_at().cmp(&b.submitted_at()))
                    .then_with(|| a.id().cmp(b.id()))
            });
        }
    }
}

/// Record a winning claim's roster move on the batch result
pub(crate) fn record_roster_move(result: &mut SettlementResult, claim: &WaiverClaim, cost: i64) {
    result.roster_moves.push(RosterMove {
        team_id: claim.team_id().to_string(),
        added_player_id: claim.player_id().to_string(),
        added_player_name: claim.player_name().to_string(),
        dropped_player_id: claim.drop_player_id().map(str::to_string),
        dropped_player_name: claim.drop_player_name().map(str::to_string),
        acquisition_cost: cost,
        acquisition_type: "waiver".to_string(),
    });
}

/// Record a reasoned claim failure on both the claim and the batch result
pub(crate) fn record_failure(
    result: &mut SettlementResult,
    claim: &mut WaiverClaim,
    reason: FailureReason,
    now: DateTime<Utc>,
) {
    // Claims handed to a policy are always pending; a transition error
    // here would mean the batch snapshot was stale
    let _ = claim.mark_failed(reason.to_string(), now);
    result.failed_claims.push(FailedClaim {
        claim_id: claim.id().to_string(),
        team_id: claim.team_id().to_string(),
        player_id: claim.player_id().to_string(),
        player_name: claim.player_name().to_string(),
        reason: reason.to_string(),
        bid_amount: claim.bid_amount(),
    });
}
