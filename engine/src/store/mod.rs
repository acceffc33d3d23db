//! Persistence layer contract
//!
//! The engine does not own storage. It consumes league configuration,
//! pending claims, budgets, priorities, standings, and roster state from a
//! [`LeagueStore`], and writes claim outcomes and settlement deltas back
//! through it. Any claim submission or query outside a settlement run reads
//! last-settled values; only the holder of a league's settlement lock
//! mutates them.
//!
//! [`MemoryStore`] is the reference single-process implementation backing
//! the test suite and single-instance deployments.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::claim::{ClaimStatus, WaiverClaim};
use crate::models::priority::WaiverPriority;
use crate::models::roster::{Roster, RosterError};
use crate::models::settings::WaiverSettings;
use crate::settlement::result::SettlementResult;

/// Errors from the persistence layer
///
/// These are system errors, distinct from claim rejections: a claim that
/// cannot fit on a roster fails *as data*, a store that cannot answer at
/// all fails the whole run.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("League {league_id} not found")]
    LeagueNotFound { league_id: String },

    #[error("Team {team_id} has no roster record")]
    TeamNotFound { team_id: String },

    #[error("Persistence layer unavailable: {0}")]
    Unavailable(String),
}

/// Result of attempting a roster move through the store
///
/// A rejection is a claim-level outcome, never a [`StoreError`].
#[derive(Debug, PartialEq)]
pub enum RosterMoveOutcome {
    /// Add (and drop, if any) applied atomically
    Applied,

    /// Move violates roster constraints; nothing changed
    Rejected(RosterError),
}

/// The persistence layer the engine runs against
///
/// Object-safe so settlement policies can take `&dyn LeagueStore`. All
/// methods are `&self`: implementations manage their own interior
/// synchronization (the engine may be shared across threads).
pub trait LeagueStore: Send + Sync {
    /// Active waiver configuration for a league
    fn waiver_settings(&self, league_id: &str) -> Result<WaiverSettings, StoreError>;

    /// All claims still pending for a league
    ///
    /// Terminal claims are never returned, which is what makes re-running
    /// a partially failed batch idempotent per claim.
    fn pending_claims(&self, league_id: &str) -> Result<Vec<WaiverClaim>, StoreError>;

    /// Look up one claim by id
    fn claim(&self, claim_id: &str) -> Result<Option<WaiverClaim>, StoreError>;

    /// Remaining FAAB budget per team (auction leagues)
    fn team_budgets(&self, league_id: &str) -> Result<HashMap<String, i64>, StoreError>;

    /// Current waiver order (rotation leagues)
    fn waiver_priorities(
        &self,
        league_id: &str,
    ) -> Result<HashMap<String, WaiverPriority>, StoreError>;

    /// Current standings position per team, higher = worse record
    /// (reverse-standings leagues)
    fn team_standings(&self, league_id: &str) -> Result<HashMap<String, u32>, StoreError>;

    /// Attempt a roster add/drop, enforcing size and drop-ownership rules
    fn try_roster_move(
        &self,
        team_id: &str,
        add_player_id: &str,
        drop_player_id: Option<&str>,
    ) -> Result<RosterMoveOutcome, StoreError>;

    /// Insert or update one claim record
    fn persist_claim(&self, claim: &WaiverClaim) -> Result<(), StoreError>;

    /// Apply a completed run's budget and priority deltas
    fn persist_results(
        &self,
        league_id: &str,
        result: &SettlementResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// One league's configuration and allocation records
#[derive(Debug, Default)]
struct LeagueRecord {
    settings: WaiverSettings,
    budgets: HashMap<String, i64>,
    priorities: HashMap<String, WaiverPriority>,
    standings: HashMap<String, u32>,
}

#[derive(Debug, Default)]
struct Inner {
    leagues: HashMap<String, LeagueRecord>,
    rosters: HashMap<String, Roster>,
    claims: HashMap<String, WaiverClaim>,
}

/// In-memory [`LeagueStore`] for tests and single-instance deployments
///
/// # Example
/// ```
/// use waiver_engine_core::store::{LeagueStore, MemoryStore};
/// use waiver_engine_core::{Roster, WaiverSettings};
///
/// let store = MemoryStore::new();
/// store.put_league("L1", WaiverSettings::default());
/// store.set_budget("L1", "T1", 10_000);
/// store.put_roster(Roster::new("T1", vec![], 15));
///
/// assert_eq!(store.team_budgets("L1").unwrap()["T1"], 10_000);
/// assert!(store.roster("T1").unwrap().has_space());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a league with its waiver settings
    pub fn put_league(&self, league_id: impl Into<String>, settings: WaiverSettings) {
        let mut inner = self.write();
        inner.leagues.entry(league_id.into()).or_default().settings = settings;
    }

    /// Set one team's remaining FAAB budget
    pub fn set_budget(&self, league_id: &str, team_id: impl Into<String>, amount: i64) {
        let mut inner = self.write();
        inner
            .leagues
            .entry(league_id.to_string())
            .or_default()
            .budgets
            .insert(team_id.into(), amount);
    }

    /// Set one team's waiver priority record
    pub fn put_priority(&self, league_id: &str, priority: WaiverPriority) {
        let mut inner = self.write();
        inner
            .leagues
            .entry(league_id.to_string())
            .or_default()
            .priorities
            .insert(priority.team_id().to_string(), priority);
    }

    /// Set one team's standings position (higher = worse record)
    pub fn set_standing(&self, league_id: &str, team_id: impl Into<String>, position: u32) {
        let mut inner = self.write();
        inner
            .leagues
            .entry(league_id.to_string())
            .or_default()
            .standings
            .insert(team_id.into(), position);
    }

    /// Set a team's roster
    pub fn put_roster(&self, roster: Roster) {
        let mut inner = self.write();
        inner.rosters.insert(roster.team_id().to_string(), roster);
    }

    /// Read back a team's roster (test assertions)
    pub fn roster(&self, team_id: &str) -> Option<Roster> {
        self.read().rosters.get(team_id).cloned()
    }
}

impl LeagueStore for MemoryStore {
    fn waiver_settings(&self, league_id: &str) -> Result<WaiverSettings, StoreError> {
        self.read()
            .leagues
            .get(league_id)
            .map(|l| l.settings.clone())
            .ok_or_else(|| StoreError::LeagueNotFound {
                league_id: league_id.to_string(),
            })
    }

    fn pending_claims(&self, league_id: &str) -> Result<Vec<WaiverClaim>, StoreError> {
        Ok(self
            .read()
            .claims
            .values()
            .filter(|c| c.league_id() == league_id && c.status() == &ClaimStatus::Pending)
            .cloned()
            .collect())
    }

    fn claim(&self, claim_id: &str) -> Result<Option<WaiverClaim>, StoreError> {
        Ok(self.read().claims.get(claim_id).cloned())
    }

    fn team_budgets(&self, league_id: &str) -> Result<HashMap<String, i64>, StoreError> {
        self.read()
            .leagues
            .get(league_id)
            .map(|l| l.budgets.clone())
            .ok_or_else(|| StoreError::LeagueNotFound {
                league_id: league_id.to_string(),
            })
    }

    fn waiver_priorities(
        &self,
        league_id: &str,
    ) -> Result<HashMap<String, WaiverPriority>, StoreError> {
        self.read()
            .leagues
            .get(league_id)
            .map(|l| l.priorities.clone())
            .ok_or_else(|| StoreError::LeagueNotFound {
                league_id: league_id.to_string(),
            })
    }

    fn team_standings(&self, league_id: &str) -> Result<HashMap<String, u32>, StoreError> {
        self.read()
            .leagues
            .get(league_id)
            .map(|l| l.standings.clone())
            .ok_or_else(|| StoreError::LeagueNotFound {
                league_id: league_id.to_string(),
            })
    }

    fn try_roster_move(
        &self,
        team_id: &str,
        add_player_id: &str,
        drop_player_id: Option<&str>,
    ) -> Result<RosterMoveOutcome, StoreError> {
        let mut inner = self.write();
        let roster = inner
            .rosters
            .get_mut(team_id)
            .ok_or_else(|| StoreError::TeamNotFound {
                team_id: team_id.to_string(),
            })?;

        match roster.apply_move(add_player_id, drop_player_id) {
            Ok(()) => Ok(RosterMoveOutcome::Applied),
            Err(err) => Ok(RosterMoveOutcome::Rejected(err)),
        }
    }

    fn persist_claim(&self, claim: &WaiverClaim) -> Result<(), StoreError> {
        self.write()
            .claims
            .insert(claim.id().to_string(), claim.clone());
        Ok(())
    }

    fn persist_results(
        &self,
        league_id: &str,
        result: &SettlementResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.write();
        let league =
            inner
                .leagues
                .get_mut(league_id)
                .ok_or_else(|| StoreError::LeagueNotFound {
                    league_id: league_id.to_string(),
                })?;

        for update in &result.budget_updates {
            league
                .budgets
                .insert(update.team_id.clone(), update.new_budget);
        }
        for update in &result.updated_priorities {
            if let Some(priority) = league.priorities.get_mut(&update.team_id) {
                priority.record_win(update.new_rank, completed_at);
            }
        }
        Ok(())
    }
}
