//! Per-league settlement exclusion
//!
//! A league has at most one settlement run in flight at any instant. The
//! lock is fail-fast: a second acquisition attempt returns `None`
//! immediately rather than blocking or queuing, so a double-triggered
//! scheduler tick is a safe no-op for the caller.
//!
//! Release is RAII: dropping the guard frees the league, whether the run
//! completed, returned an error, or unwound. This token lives in process
//! memory, which is only valid for a single-instance deployment; a
//! multi-node deployment needs a shared primitive (database row lock or
//! equivalent) behind the same acquire/release shape.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of leagues with a settlement run in flight
#[derive(Debug, Clone, Default)]
pub struct LeagueLocks {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl LeagueLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the league; `None` if a run is already in flight
    pub fn try_acquire(&self, league_id: &str) -> Option<LeagueLockGuard> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(league_id.to_string()) {
            return None;
        }
        Some(LeagueLockGuard {
            league_id: league_id.to_string(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Whether a settlement run currently holds the league
    pub fn is_locked(&self, league_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(league_id)
    }
}

/// Held for the duration of one settlement run
#[derive(Debug)]
pub struct LeagueLockGuard {
    league_id: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for LeagueLockGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.league_id);
    }
}
