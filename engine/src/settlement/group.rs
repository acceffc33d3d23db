//! Claim grouping
//!
//! Pure partition of a claim batch by contested player. No ordering or
//! tie-break logic lives here; that belongs to the active policy.

use std::collections::BTreeMap;

use crate::models::claim::WaiverClaim;

/// Partition claims by target player id
///
/// Returns a `BTreeMap` so callers iterate contested players in a stable
/// (ascending player id) order. Budget and priority mutations made while
/// resolving one player are visible to the next, so a deterministic group
/// order keeps whole runs reproducible.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use waiver_engine_core::WaiverClaim;
/// use waiver_engine_core::settlement::group_by_player;
///
/// let now = Utc::now();
/// let claims = vec![
///     WaiverClaim::new("L1", "T1", "P1", "One", "RB", now, now),
///     WaiverClaim::new("L1", "T2", "P1", "One", "RB", now, now),
///     WaiverClaim::new("L1", "T1", "P2", "Two", "WR", now, now),
/// ];
///
/// let groups = group_by_player(claims);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups["P1"].len(), 2);
/// ```
pub fn group_by_player(claims: Vec<WaiverClaim>) -> BTreeMap<String, Vec<WaiverClaim>> {
    let mut grouped: BTreeMap<String, Vec<WaiverClaim>> = BTreeMap::new();
    for claim in claims {
        grouped
            .entry(claim.player_id().to_string())
            .or_default()
            .push(claim);
    }
    grouped
}
