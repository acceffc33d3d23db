//! Settlement batch result payload
//!
//! One [`SettlementResult`] is produced per settlement run. It is the only
//! thing a run persists and publishes: claim outcomes, budget and priority
//! deltas, roster moves, and aggregate statistics. The batch itself is
//! ephemeral and reconstructed each run from the store.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};

/// A winning claim, as recorded in the batch result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedClaim {
    pub claim_id: String,
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    pub drop_player_id: Option<String>,
    pub drop_player_name: Option<String>,
    /// Winning bid (auction policy)
    pub bid_amount: Option<i64>,
    /// Rank the claim won at (rotation policy)
    pub priority: Option<u32>,
}

/// A claim that failed with an explicit reason
///
/// Claims that simply lost the player to an earlier claim in the order are
/// not listed here; they only count toward [`ProcessingStats::failed_claims`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedClaim {
    pub claim_id: String,
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    pub reason: String,
    pub bid_amount: Option<i64>,
}

/// Rotation-policy rank change for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityUpdate {
    pub team_id: String,
    pub team_name: String,
    pub old_rank: u32,
    pub new_rank: u32,
    pub reason: String,
}

/// FAAB debit for one winning claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUpdate {
    pub team_id: String,
    pub old_budget: i64,
    pub new_budget: i64,
    pub amount_spent: i64,
}

/// An add/drop applied to a team's roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMove {
    pub team_id: String,
    pub added_player_id: String,
    pub added_player_name: String,
    pub dropped_player_id: Option<String>,
    pub dropped_player_name: Option<String>,
    /// Winning bid for auction claims, 0 otherwise
    pub acquisition_cost: i64,
    pub acquisition_type: String,
}

/// Aggregate statistics for one settlement run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_claims: usize,
    pub successful_claims: usize,
    pub failed_claims: usize,
    /// Total value debited across all winning bids (cents)
    pub total_faab_spent: i64,
    /// Distinct contested players resolved
    pub players_processed: usize,
    /// Wall-clock duration of the run
    pub processing_time_ms: u64,
}

/// Everything one settlement run decided
///
/// # Example
/// ```
/// use waiver_engine_core::settlement::SettlementResult;
///
/// let result = SettlementResult::empty(0);
/// assert_eq!(result.stats.total_claims, 0);
/// assert!(result.processed_claims.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub processed_claims: Vec<ProcessedClaim>,
    pub updated_priorities: Vec<PriorityUpdate>,
    pub budget_updates: Vec<BudgetUpdate>,
    pub failed_claims: Vec<FailedClaim>,
    pub roster_moves: Vec<RosterMove>,
    pub stats: ProcessingStats,
}

impl SettlementResult {
    /// A result with zero outcomes for a batch of `total_claims` claims
    pub fn empty(total_claims: usize) -> Self {
        Self {
            stats: ProcessingStats {
                total_claims,
                ..ProcessingStats::default()
            },
            ..Self::default()
        }
    }
}
