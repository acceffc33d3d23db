//! Waiver claim model
//!
//! Represents one team's request to acquire an unrostered player,
//! optionally dropping a rostered player to make room.
//! Each claim has:
//! - League, team, and target player references
//! - Optional drop player
//! - Optional bid amount (i64 cents, auction policy only)
//! - Optional priority rank snapshot taken at submission
//! - Status (Pending, Successful, Failed, Cancelled)
//! - The scheduled settlement timestamp it belongs to
//!
//! CRITICAL: All money values are i64 (cents)
//!
//! # Lifecycle
//!
//! `Pending` is the only non-terminal state. A claim is mutated exactly
//! once: by the settlement run that owns its `process_at`, or by a
//! team-initiated cancellation while still pending. Every transition out
//! of a terminal state is rejected with [`ClaimError::AlreadyProcessed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claim lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Awaiting the next settlement run
    Pending,

    /// Player awarded to this claim
    Successful,

    /// Claim lost: outbid, out-prioritized, or rejected with a reason
    Failed,

    /// Withdrawn by the owning team before settlement
    Cancelled,
}

impl ClaimStatus {
    /// Pending is the only non-terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }
}

/// Errors that can occur during claim state transitions
#[derive(Debug, Error, PartialEq)]
pub enum ClaimError {
    #[error("Claim {claim_id} already reached terminal state {status:?}")]
    AlreadyProcessed {
        claim_id: String,
        status: ClaimStatus,
    },
}

/// A request by one team to acquire one unrostered player
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use waiver_engine_core::{ClaimStatus, WaiverClaim};
///
/// let submitted = Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, 0).unwrap();
/// let process_at = Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap();
/// let claim = WaiverClaim::new("league_1", "team_a", "player_x", "J. Doe", "WR", process_at, submitted)
///     .with_bid(5_000); // $50.00
///
/// assert_eq!(claim.status(), &ClaimStatus::Pending);
/// assert_eq!(claim.bid_amount(), Some(5_000));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiverClaim {
    /// Unique claim identifier (UUID)
    id: String,

    /// League this claim settles in
    league_id: String,

    /// Requesting team
    team_id: String,

    /// Target player
    player_id: String,
    player_name: String,
    position: String,

    /// Player to drop if the claim wins (None = needs open roster space)
    drop_player_id: Option<String>,
    drop_player_name: Option<String>,

    /// Sealed bid (i64 cents). Present for the auction policy only.
    bid_amount: Option<i64>,

    /// Waiver priority rank snapshot at submission time. Orders rotation
    /// claims and decides the `priority` tiebreak under the other policies.
    priority: Option<u32>,

    /// Current status
    status: ClaimStatus,

    /// Human-readable reason when status is Failed
    failure_reason: Option<String>,

    /// The settlement run this claim belongs to: always the league's next
    /// scheduled run at submission time
    process_at: DateTime<Utc>,

    /// When the team submitted the claim
    submitted_at: DateTime<Utc>,

    /// When a settlement run (or cancellation) resolved the claim
    processed_at: Option<DateTime<Utc>>,
}

impl WaiverClaim {
    /// Create a new pending claim
    ///
    /// # Arguments
    /// * `league_id` - League the claim settles in
    /// * `team_id` - Requesting team
    /// * `player_id` / `player_name` / `position` - Target player
    /// * `process_at` - The league's next scheduled settlement run
    /// * `submitted_at` - Submission timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        league_id: impl Into<String>,
        team_id: impl Into<String>,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        position: impl Into<String>,
        process_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            league_id: league_id.into(),
            team_id: team_id.into(),
            player_id: player_id.into(),
            player_name: player_name.into(),
            position: position.into(),
            drop_player_id: None,
            drop_player_name: None,
            bid_amount: None,
            priority: None,
            status: ClaimStatus::Pending,
            failure_reason: None,
            process_at,
            submitted_at,
            processed_at: None,
        }
    }

    /// Attach a sealed bid (auction policy)
    pub fn with_bid(mut self, amount: i64) -> Self {
        self.bid_amount = Some(amount);
        self
    }

    /// Attach a drop player
    pub fn with_drop_player(
        mut self,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
    ) -> Self {
        self.drop_player_id = Some(player_id.into());
        self.drop_player_name = Some(player_name.into());
        self
    }

    /// Snapshot the team's waiver priority rank at submission
    pub fn with_priority_snapshot(mut self, rank: u32) -> Self {
        self.priority = Some(rank);
        self
    }

    // Accessors

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn drop_player_id(&self) -> Option<&str> {
        self.drop_player_id.as_deref()
    }

    pub fn drop_player_name(&self) -> Option<&str> {
        self.drop_player_name.as_deref()
    }

    pub fn bid_amount(&self) -> Option<i64> {
        self.bid_amount
    }

    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    pub fn status(&self) -> &ClaimStatus {
        &self.status
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn process_at(&self) -> DateTime<Utc> {
        self.process_at
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    // Transitions

    /// Mark the claim successful (settlement run only)
    pub fn mark_successful(&mut self, now: DateTime<Utc>) -> Result<(), ClaimError> {
        self.ensure_pending()?;
        self.status = ClaimStatus::Successful;
        self.processed_at = Some(now);
        Ok(())
    }

    /// Mark the claim failed with a human-readable reason
    pub fn mark_failed(
        &mut self,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        self.ensure_pending()?;
        self.status = ClaimStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.processed_at = Some(now);
        Ok(())
    }

    /// Mark the claim failed without a reason
    ///
    /// Used for claims that lost the player to an earlier claim in the
    /// settlement order: not a rejection, simply absent from the winners.
    pub fn mark_lost(&mut self, now: DateTime<Utc>) -> Result<(), ClaimError> {
        self.ensure_pending()?;
        self.status = ClaimStatus::Failed;
        self.processed_at = Some(now);
        Ok(())
    }

    /// Cancel the claim (team-initiated, pending only)
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), ClaimError> {
        self.ensure_pending()?;
        self.status = ClaimStatus::Cancelled;
        self.processed_at = Some(now);
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), ClaimError> {
        if self.status.is_terminal() {
            return Err(ClaimError::AlreadyProcessed {
                claim_id: self.id.clone(),
                status: self.status.clone(),
            });
        }
        Ok(())
    }
}
