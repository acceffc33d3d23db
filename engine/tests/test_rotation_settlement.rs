//! Rotation (rolling priority) settlement tests
//!
//! Lowest rank picks first; winning a claim pushes the team to one past
//! the current worst rank, so the order stays total across runs.

use chrono::{DateTime, TimeZone, Utc};
use waiver_engine_core::publish::NullPublisher;
use waiver_engine_core::store::{LeagueStore, MemoryStore};
use waiver_engine_core::{Roster, WaiverClaim, WaiverEngine, WaiverPriority, WaiverSettings};

fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap()
}

fn claim(team: &str, player: &str, secs: u32) -> WaiverClaim {
    let submitted = Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, secs).unwrap();
    WaiverClaim::new("L1", team, player, player, "WR", run_time(), submitted)
}

fn rotation_store(ranks: &[(&str, u32)]) -> MemoryStore {
    let store = MemoryStore::new();
    store.put_league("L1", WaiverSettings::rotation());
    for (team, rank) in ranks {
        store.put_priority("L1", WaiverPriority::new(*team, *team, *rank));
        store.put_roster(Roster::new(*team, vec![], 15));
    }
    store
}

// ============================================================================
// Scenario: three teams, ranks [1, 2, 3], all claim the same player
// ============================================================================

#[test]
fn test_lowest_rank_wins_and_rolls_to_the_back() {
    let store = rotation_store(&[("T1", 1), ("T2", 2), ("T3", 3)]);
    store.persist_claim(&claim("T3", "P1", 0)).unwrap();
    store.persist_claim(&claim("T1", "P1", 1)).unwrap();
    store.persist_claim(&claim("T2", "P1", 2)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.successful_claims, 1);
    assert_eq!(result.processed_claims[0].team_id, "T1");
    assert_eq!(result.processed_claims[0].priority, Some(1));
    assert_eq!(result.processed_claims[0].bid_amount, None);

    // Winner moves to max + 1; the others keep their ranks
    assert_eq!(result.updated_priorities.len(), 1);
    let update = &result.updated_priorities[0];
    assert_eq!(update.team_id, "T1");
    assert_eq!(update.old_rank, 1);
    assert_eq!(update.new_rank, 4);
    assert_eq!(
        update.reason,
        "Successful waiver claim - moved to back of line"
    );

    let priorities = engine.store().waiver_priorities("L1").unwrap();
    assert_eq!(priorities["T1"].rank(), 4);
    assert_eq!(priorities["T2"].rank(), 2);
    assert_eq!(priorities["T3"].rank(), 3);
    assert_eq!(priorities["T1"].last_successful_claim(), Some(run_time()));

    // Free acquisition under rotation
    assert_eq!(result.stats.total_faab_spent, 0);
    assert_eq!(result.roster_moves[0].acquisition_cost, 0);
}

#[test]
fn test_rollover_applies_within_the_same_run() {
    let store = rotation_store(&[("T1", 1), ("T2", 2)]);

    // Groups settle in ascending player id order: PA then PB. T1 wins PA
    // and rolls behind T2, so T2 takes PB even though T1 also claimed it.
    store.persist_claim(&claim("T1", "PA", 0)).unwrap();
    store.persist_claim(&claim("T1", "PB", 1)).unwrap();
    store.persist_claim(&claim("T2", "PB", 2)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.successful_claims, 2);
    let winners: Vec<(&str, &str)> = result
        .processed_claims
        .iter()
        .map(|p| (p.player_id.as_str(), p.team_id.as_str()))
        .collect();
    assert_eq!(winners, vec![("PA", "T1"), ("PB", "T2")]);

    let priorities = engine.store().waiver_priorities("L1").unwrap();
    assert_eq!(priorities["T1"].rank(), 3);
    assert_eq!(priorities["T2"].rank(), 4);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_full_roster_passes_player_to_next_rank() {
    let store = rotation_store(&[("T2", 2)]);
    store.put_priority("L1", WaiverPriority::new("T1", "T1", 1));
    store.put_roster(Roster::new("T1", vec!["x1".into()], 1));

    store.persist_claim(&claim("T1", "P1", 0)).unwrap();
    store.persist_claim(&claim("T2", "P1", 1)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.processed_claims[0].team_id, "T2");
    assert_eq!(
        result.failed_claims[0].reason,
        "No roster space and no drop player specified"
    );

    // The failed team keeps its front-of-line rank
    let priorities = engine.store().waiver_priorities("L1").unwrap();
    assert_eq!(priorities["T1"].rank(), 1);
}

#[test]
fn test_team_without_priority_record_is_skipped() {
    let store = rotation_store(&[("RANKED", 5)]);
    store.put_roster(Roster::new("UNRANKED", vec![], 15));

    store.persist_claim(&claim("UNRANKED", "P1", 0)).unwrap();
    store.persist_claim(&claim("RANKED", "P1", 1)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.processed_claims[0].team_id, "RANKED");
    assert_eq!(result.stats.successful_claims, 1);
}
