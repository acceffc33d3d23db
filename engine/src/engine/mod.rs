//! Waiver engine - claim intake and settlement runs
//!
//! [`WaiverEngine`] ties the pieces together: it validates and stores
//! incoming claims, computes each claim's scheduled settlement timestamp,
//! and drives the lock-guarded batch that resolves all of a league's
//! pending claims at once.
//!
//! # Settlement flow
//!
//! ```text
//! trigger fires → acquire league lock → load settings + pending claims
//!     → snapshot allocation state (budgets / priorities / standings)
//!     → group claims by player → policy orders and walks each group
//!     → persist claim outcomes per group → persist budget/priority deltas
//!     → publish settlement-complete → release lock
//! ```
//!
//! # Critical Invariants
//!
//! 1. At most one settlement run per league at any instant; a concurrent
//!    trigger fails fast with [`SettlementError::AlreadyInProgress`]
//! 2. A run with zero pending claims completes trivially with an all-zero
//!    result and still releases the lock
//! 3. The lock is released unconditionally, including on store errors
//! 4. Claims are resolved at most once; terminal claims never re-enter a
//!    batch

use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::schedule::{next_process_time, run_seed};
use crate::models::claim::WaiverClaim;
use crate::models::settings::PolicyKind;
use crate::publish::{ClaimSubmittedAck, OutcomePublisher};
use crate::rng::RngManager;
use crate::settlement::{group_by_player, policy_for, AllocationState, SettlementResult};
use crate::store::{LeagueStore, StoreError};

pub mod lock;

pub use lock::{LeagueLockGuard, LeagueLocks};

/// Claim rejected at submission time
///
/// These are synchronous validation failures; the claim is never stored.
#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Auction waivers require a bid amount")]
    MissingBid,

    #[error("Bids are not accepted under {policy:?} waivers")]
    UnexpectedBid { policy: PolicyKind },

    #[error("Bid amount must be non-negative")]
    NegativeBid,

    #[error("Zero bids are not allowed in this league")]
    ZeroBidNotAllowed,

    #[error("Bid {bid} is below the league minimum bid {min_bid}")]
    BidBelowMinimum { bid: i64, min_bid: i64 },

    #[error("Fractional bids are not allowed in this league")]
    FractionalBidNotAllowed,

    #[error("Bid {bid} is not a multiple of the league bid increment {increment}")]
    BidIncrementViolation { bid: i64, increment: i64 },

    #[error("Bid {bid} exceeds team {team_id}'s remaining budget {budget}")]
    BidExceedsBudget {
        bid: i64,
        team_id: String,
        budget: i64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cancellation rejected
#[derive(Debug, Error, PartialEq)]
pub enum CancelError {
    #[error("Waiver claim {claim_id} not found")]
    NotFound { claim_id: String },

    #[error("Claim {claim_id} does not belong to team {team_id}")]
    NotOwner { claim_id: String, team_id: String },

    #[error("Claim {claim_id} is no longer pending")]
    NotPending { claim_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settlement run failed
///
/// Individual claim rejections are never errors; they are outcomes
/// recorded in the [`SettlementResult`].
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("Waiver settlement already in progress for league {league_id}")]
    AlreadyInProgress { league_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A team's request to submit a new waiver claim
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    pub league_id: String,
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub drop_player_id: Option<String>,
    pub drop_player_name: Option<String>,
    /// Sealed bid in cents (auction leagues only)
    pub bid_amount: Option<i64>,
}

/// The waiver claim settlement engine
///
/// Generic over its two external collaborators: the persistence layer and
/// the notification sink. All entry points take "now" explicitly, so the
/// engine itself never reads the wall clock except to time a run.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use waiver_engine_core::publish::NullPublisher;
/// use waiver_engine_core::store::MemoryStore;
/// use waiver_engine_core::{WaiverEngine, WaiverSettings};
///
/// let store = MemoryStore::new();
/// store.put_league("L1", WaiverSettings::default());
///
/// let engine = WaiverEngine::new(store, NullPublisher);
/// let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
///
/// // No pending claims: trivial all-zero run
/// let result = engine.run_settlement("L1", now).unwrap();
/// assert_eq!(result.stats.total_claims, 0);
/// ```
pub struct WaiverEngine<S: LeagueStore, P: OutcomePublisher> {
    store: S,
    publisher: P,
    locks: LeagueLocks,
    rng_seed: Option<u64>,
}

impl<S: LeagueStore, P: OutcomePublisher> WaiverEngine<S, P> {
    pub fn new(store: S, publisher: P) -> Self {
        Self {
            store,
            publisher,
            locks: LeagueLocks::new(),
            rng_seed: None,
        }
    }

    /// Pin the RNG seed used by the `random` tiebreak (deterministic replay)
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Next scheduled settlement run for a league, strictly after `now`
    ///
    /// Idempotent: every call before the computed time returns the same
    /// timestamp, so all claims submitted in one cycle share one run.
    pub fn next_run(&self, league_id: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
        let settings = self.store.waiver_settings(league_id)?;
        Ok(next_process_time(
            now,
            settings.process_weekday,
            settings.process_time,
        ))
    }

    /// Validate, store, and acknowledge a new claim
    ///
    /// The bid/budget check here is a soft check against the last-settled
    /// budget; the hard check happens again inside the owning settlement
    /// run, where earlier wins in the same batch may have shrunk it.
    pub fn submit_claim(
        &self,
        request: ClaimRequest,
        now: DateTime<Utc>,
    ) -> Result<WaiverClaim, SubmitError> {
        let settings = self.store.waiver_settings(&request.league_id)?;
        let process_at = next_process_time(now, settings.process_weekday, settings.process_time);

        let mut claim = WaiverClaim::new(
            &request.league_id,
            &request.team_id,
            &request.player_id,
            &request.player_name,
            &request.position,
            process_at,
            now,
        );
        if let (Some(drop_id), Some(drop_name)) =
            (&request.drop_player_id, &request.drop_player_name)
        {
            claim = claim.with_drop_player(drop_id, drop_name);
        }

        match settings.policy {
            PolicyKind::Auction => {
                let bid = request.bid_amount.ok_or(SubmitError::MissingBid)?;
                if bid < 0 {
                    return Err(SubmitError::NegativeBid);
                }
                if bid == 0 && !settings.allow_zero_bids {
                    return Err(SubmitError::ZeroBidNotAllowed);
                }
                if bid > 0 && bid < settings.min_bid {
                    return Err(SubmitError::BidBelowMinimum {
                        bid,
                        min_bid: settings.min_bid,
                    });
                }
                if !settings.fractional_bids && bid % 100 != 0 {
                    return Err(SubmitError::FractionalBidNotAllowed);
                }
                if settings.bid_increment > 0 && bid % settings.bid_increment != 0 {
                    return Err(SubmitError::BidIncrementViolation {
                        bid,
                        increment: settings.bid_increment,
                    });
                }

                let budgets = self.store.team_budgets(&request.league_id)?;
                let budget = budgets.get(&request.team_id).copied().unwrap_or(0);
                if bid > budget {
                    return Err(SubmitError::BidExceedsBudget {
                        bid,
                        team_id: request.team_id.clone(),
                        budget,
                    });
                }
                claim = claim.with_bid(bid);
            }
            PolicyKind::Rotation | PolicyKind::ReverseStandings => {
                if request.bid_amount.is_some() {
                    return Err(SubmitError::UnexpectedBid {
                        policy: settings.policy,
                    });
                }
            }
        }

        // Rank snapshot, taken for every policy: it orders rotation groups
        // and decides the `priority` tiebreak rule for the others
        let priorities = self.store.waiver_priorities(&request.league_id)?;
        if let Some(priority) = priorities.get(&request.team_id) {
            claim = claim.with_priority_snapshot(priority.rank());
        }

        self.store.persist_claim(&claim)?;
        self.publisher
            .claim_submitted(&ClaimSubmittedAck::for_claim(&claim));
        tracing::info!(
            league_id = %claim.league_id(),
            claim_id = %claim.id(),
            player_id = %claim.player_id(),
            process_at = %claim.process_at(),
            "waiver claim accepted"
        );
        Ok(claim)
    }

    /// Cancel a pending claim (owning team only)
    pub fn cancel_claim(
        &self,
        claim_id: &str,
        team_id: &str,
        now: DateTime<Utc>,
    ) -> Result<WaiverClaim, CancelError> {
        let Some(mut claim) = self.store.claim(claim_id)? else {
            return Err(CancelError::NotFound {
                claim_id: claim_id.to_string(),
            });
        };
        if claim.team_id() != team_id {
            return Err(CancelError::NotOwner {
                claim_id: claim_id.to_string(),
                team_id: team_id.to_string(),
            });
        }
        claim.cancel(now).map_err(|_| CancelError::NotPending {
            claim_id: claim_id.to_string(),
        })?;
        self.store.persist_claim(&claim)?;
        tracing::info!(claim_id = %claim.id(), "waiver claim cancelled");
        Ok(claim)
    }

    /// Resolve all of a league's pending claims in one locked batch
    ///
    /// Triggered at the scheduled time, or on demand for backfill. A
    /// second call while one is in flight fails immediately with
    /// [`SettlementError::AlreadyInProgress`] and mutates nothing; callers
    /// should treat that as non-fatal and not retry.
    pub fn run_settlement(
        &self,
        league_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SettlementResult, SettlementError> {
        let _guard = self.locks.try_acquire(league_id).ok_or_else(|| {
            tracing::warn!(league_id, "settlement trigger rejected: run already in flight");
            SettlementError::AlreadyInProgress {
                league_id: league_id.to_string(),
            }
        })?;
        let started = Instant::now();
        tracing::info!(league_id, "starting waiver settlement run");

        let settings = self.store.waiver_settings(league_id)?;
        let pending = self.store.pending_claims(league_id)?;

        if pending.is_empty() {
            let mut result = SettlementResult::empty(0);
            result.stats.processing_time_ms = started.elapsed().as_millis() as u64;
            self.store.persist_results(league_id, &result, now)?;
            self.publisher.settlement_complete(league_id, &result);
            tracing::info!(league_id, "no pending waiver claims");
            return Ok(result);
        }

        // Allocation snapshot, taken once per run
        let mut alloc = match settings.policy {
            PolicyKind::Auction => AllocationState::new(
                self.store.team_budgets(league_id)?,
                Default::default(),
                Default::default(),
            ),
            PolicyKind::Rotation => AllocationState::new(
                Default::default(),
                self.store.waiver_priorities(league_id)?,
                Default::default(),
            ),
            PolicyKind::ReverseStandings => AllocationState::new(
                Default::default(),
                Default::default(),
                self.store.team_standings(league_id)?,
            ),
        };

        let policy = policy_for(settings.policy);
        let mut rng = RngManager::new(self.rng_seed.unwrap_or_else(|| run_seed(now)));
        let mut result = SettlementResult::empty(pending.len());

        for (player_id, mut group) in group_by_player(pending) {
            policy.order_group(&mut group, &alloc, settings.tiebreaker, &mut rng);
            policy.resolve_group(&mut group, &mut alloc, &self.store, &mut result, now)?;

            // Claims the winner walk never reached lose by omission:
            // terminal, but with no failure reason
            for claim in group.iter_mut() {
                if claim.is_pending() {
                    let _ = claim.mark_lost(now);
                }
                self.store.persist_claim(claim)?;
            }

            result.stats.players_processed += 1;
            tracing::debug!(
                league_id,
                player_id = %player_id,
                claims = group.len(),
                "resolved claim group"
            );
        }

        result.stats.failed_claims =
            result.stats.total_claims - result.stats.successful_claims;
        result.stats.processing_time_ms = started.elapsed().as_millis() as u64;

        self.store.persist_results(league_id, &result, now)?;
        self.publisher.settlement_complete(league_id, &result);
        tracing::info!(
            league_id,
            total = result.stats.total_claims,
            successful = result.stats.successful_claims,
            failed = result.stats.failed_claims,
            elapsed_ms = result.stats.processing_time_ms,
            "waiver settlement run complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::WaiverSettings;
    use crate::publish::NullPublisher;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn monday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_next_run_matches_settings() {
        let store = MemoryStore::new();
        store.put_league("L1", WaiverSettings::default()); // Wednesday 03:00
        let engine = WaiverEngine::new(store, NullPublisher);

        let next = engine.next_run("L1", monday_noon()).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_league_surfaces_store_error() {
        let engine = WaiverEngine::new(MemoryStore::new(), NullPublisher);
        let err = engine.run_settlement("nope", monday_noon()).unwrap_err();
        assert!(matches!(err, SettlementError::Store(_)));
        // Lock must have been released despite the error
        let err = engine.run_settlement("nope", monday_noon()).unwrap_err();
        assert!(matches!(err, SettlementError::Store(_)));
    }

    #[test]
    fn test_empty_run_produces_all_zero_result() {
        let store = MemoryStore::new();
        store.put_league("L1", WaiverSettings::default());
        let engine = WaiverEngine::new(store, NullPublisher);

        let result = engine.run_settlement("L1", monday_noon()).unwrap();
        assert_eq!(result.stats.total_claims, 0);
        assert_eq!(result.stats.successful_claims, 0);
        assert_eq!(result.stats.players_processed, 0);

        // Lock released: an immediate second run is fine
        assert!(engine.run_settlement("L1", monday_noon()).is_ok());
    }
}
