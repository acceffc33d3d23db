//! Outcome publishing
//!
//! The engine produces two notifications for the surrounding system:
//! an immediate per-claim acknowledgment at submission time (so the team
//! knows when to expect resolution) and one settlement-complete message
//! per run carrying the full batch result. Delivery (websockets, a message
//! bus) is the embedding system's concern; the engine only hands over
//! serializable payloads.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::claim::WaiverClaim;
use crate::settlement::result::SettlementResult;

/// Acknowledgment sent the moment a claim is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmittedAck {
    pub league_id: String,
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    /// When the owning settlement run will resolve this claim
    pub process_at: DateTime<Utc>,
    /// Sealed bid, if the league runs an auction
    pub bid_amount: Option<i64>,
    /// Waiver rank snapshot, when the team holds one
    pub priority: Option<u32>,
}

impl ClaimSubmittedAck {
    pub fn for_claim(claim: &WaiverClaim) -> Self {
        Self {
            league_id: claim.league_id().to_string(),
            team_id: claim.team_id().to_string(),
            player_id: claim.player_id().to_string(),
            player_name: claim.player_name().to_string(),
            process_at: claim.process_at(),
            bid_amount: claim.bid_amount(),
            priority: claim.priority(),
        }
    }
}

/// Sink for engine notifications
pub trait OutcomePublisher: Send + Sync {
    /// A claim was accepted and scheduled
    fn claim_submitted(&self, ack: &ClaimSubmittedAck);

    /// A settlement run finished for a league
    fn settlement_complete(&self, league_id: &str, result: &SettlementResult);
}

// Shared publishers work unchanged (the engine takes its publisher by value)
impl<P: OutcomePublisher + ?Sized> OutcomePublisher for std::sync::Arc<P> {
    fn claim_submitted(&self, ack: &ClaimSubmittedAck) {
        (**self).claim_submitted(ack);
    }

    fn settlement_complete(&self, league_id: &str, result: &SettlementResult) {
        (**self).settlement_complete(league_id, result);
    }
}

/// Publisher that drops everything (embedding without notifications)
#[derive(Debug, Default)]
pub struct NullPublisher;

impl OutcomePublisher for NullPublisher {
    fn claim_submitted(&self, _ack: &ClaimSubmittedAck) {}

    fn settlement_complete(&self, _league_id: &str, _result: &SettlementResult) {}
}

/// Publisher that emits structured log records
#[derive(Debug, Default)]
pub struct LogPublisher;

impl OutcomePublisher for LogPublisher {
    fn claim_submitted(&self, ack: &ClaimSubmittedAck) {
        tracing::info!(
            league_id = %ack.league_id,
            team_id = %ack.team_id,
            player_id = %ack.player_id,
            process_at = %ack.process_at,
            "waiver claim submitted"
        );
    }

    fn settlement_complete(&self, league_id: &str, result: &SettlementResult) {
        tracing::info!(
            league_id = %league_id,
            total = result.stats.total_claims,
            successful = result.stats.successful_claims,
            failed = result.stats.failed_claims,
            faab_spent = result.stats.total_faab_spent,
            elapsed_ms = result.stats.processing_time_ms,
            "waiver settlement complete"
        );
    }
}

/// Publisher that records every notification (test double)
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    acks: Mutex<Vec<ClaimSubmittedAck>>,
    completions: Mutex<Vec<(String, SettlementResult)>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acks(&self) -> Vec<ClaimSubmittedAck> {
        self.acks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn completions(&self) -> Vec<(String, SettlementResult)> {
        self.completions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutcomePublisher for RecordingPublisher {
    fn claim_submitted(&self, ack: &ClaimSubmittedAck) {
        self.acks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ack.clone());
    }

    fn settlement_complete(&self, league_id: &str, result: &SettlementResult) {
        self.completions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((league_id.to_string(), result.clone()));
    }
}
