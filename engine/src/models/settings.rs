//! Per-league waiver configuration
//!
//! Exactly one allocation policy is active per league at a time. Changing
//! the policy does not retroactively alter already-settled claims; it only
//! affects how future runs arbitrate pending ones.
//!
//! CRITICAL: All money values are i64 (cents)

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Which allocation policy arbitrates competing claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// FAAB auction: highest sealed bid wins, budget debited
    Auction,

    /// Rolling priority: lowest rank wins, winner sent to the back
    Rotation,

    /// Reverse standings: worst record wins, no state mutation
    ReverseStandings,
}

/// Secondary ordering applied when the policy's primary criterion ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreaker {
    /// Numeric priority rank snapshotted at submission, ascending
    Priority,

    /// Earlier submission wins
    SubmissionTime,

    /// Uniform shuffle, re-drawn every settlement run
    Random,
}

/// Active waiver policy and its parameters for one league
///
/// # Example
/// ```
/// use waiver_engine_core::{PolicyKind, WaiverSettings};
///
/// let settings = WaiverSettings::default();
/// assert_eq!(settings.policy, PolicyKind::Auction);
/// assert_eq!(settings.faab_budget, 10_000); // $100.00
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiverSettings {
    /// Active allocation policy
    pub policy: PolicyKind,

    /// Weekday of the scheduled settlement run
    pub process_weekday: Weekday,

    /// Time-of-day of the scheduled settlement run (UTC)
    pub process_time: NaiveTime,

    /// Starting FAAB budget per team (i64 cents, auction only)
    pub faab_budget: i64,

    /// Minimum accepted bid (i64 cents)
    pub min_bid: i64,

    /// Required bid granularity (i64 cents)
    pub bid_increment: i64,

    /// Secondary ordering for tied claims
    pub tiebreaker: Tiebreaker,

    /// Bids hidden from other teams until settlement
    pub blind_bidding: bool,

    /// Waivers run year-round rather than only in-season
    pub continual_waivers: bool,

    /// Hours a dropped player stays claimable before clearing to free agency
    pub waiver_period_hours: u32,

    /// Accept winning bids of 0
    pub allow_zero_bids: bool,

    /// Accept bids that are not a whole number of dollars
    pub fractional_bids: bool,
}

impl Default for WaiverSettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Auction,
            process_weekday: Weekday::Wed,
            process_time: NaiveTime::from_hms_opt(3, 0, 0).unwrap_or_default(),
            faab_budget: 10_000,
            min_bid: 0,
            bid_increment: 100,
            tiebreaker: Tiebreaker::Priority,
            blind_bidding: true,
            continual_waivers: true,
            waiver_period_hours: 24,
            allow_zero_bids: true,
            fractional_bids: false,
        }
    }
}

impl WaiverSettings {
    /// Settings for a rotation (rolling priority) league
    pub fn rotation() -> Self {
        Self {
            policy: PolicyKind::Rotation,
            ..Self::default()
        }
    }

    /// Settings for a reverse-standings league
    pub fn reverse_standings() -> Self {
        Self {
            policy: PolicyKind::ReverseStandings,
            ..Self::default()
        }
    }
}
