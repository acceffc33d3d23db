//! FAAB auction settlement tests
//!
//! End-to-end runs through the engine: highest sealed bid wins, budgets
//! are debited exactly, and claims the winner walk never reached fail
//! without a reason.

use chrono::{DateTime, TimeZone, Utc};
use waiver_engine_core::publish::NullPublisher;
use waiver_engine_core::store::{LeagueStore, MemoryStore};
use waiver_engine_core::{
    ClaimRequest, ClaimStatus, Roster, Tiebreaker, WaiverClaim, WaiverEngine, WaiverPriority,
    WaiverSettings,
};

fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap()
}

fn claim(team: &str, player: &str, bid: i64, secs: u32) -> WaiverClaim {
    let submitted = Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, secs).unwrap();
    WaiverClaim::new("L1", team, player, player, "RB", run_time(), submitted).with_bid(bid)
}

fn auction_store() -> MemoryStore {
    let store = MemoryStore::new();
    let mut settings = WaiverSettings::default();
    settings.tiebreaker = Tiebreaker::SubmissionTime;
    store.put_league("L1", settings);
    store
}

// ============================================================================
// Scenario: two teams bid on the same player
// ============================================================================

#[test]
fn test_highest_bid_wins_and_is_debited_exactly() {
    let store = auction_store();
    store.set_budget("L1", "T1", 10_000); // $100
    store.set_budget("L1", "T2", 8_000); // $80
    store.put_roster(Roster::new("T1", vec![], 15));
    store.put_roster(Roster::new("T2", vec![], 15));

    let winner = claim("T1", "P1", 5_000, 0); // $50
    let loser = claim("T2", "P1", 3_000, 1); // $30
    store.persist_claim(&winner).unwrap();
    store.persist_claim(&loser).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.total_claims, 2);
    assert_eq!(result.stats.successful_claims, 1);
    assert_eq!(result.stats.failed_claims, 1);
    assert_eq!(result.stats.players_processed, 1);
    assert_eq!(result.stats.total_faab_spent, 5_000);

    assert_eq!(result.processed_claims.len(), 1);
    assert_eq!(result.processed_claims[0].team_id, "T1");
    assert_eq!(result.processed_claims[0].bid_amount, Some(5_000));

    // Winner debited exactly the bid; loser untouched
    let budgets = engine.store().team_budgets("L1").unwrap();
    assert_eq!(budgets["T1"], 5_000);
    assert_eq!(budgets["T2"], 8_000);

    // Player landed on the winning roster only
    assert!(engine.store().roster("T1").unwrap().contains("P1"));
    assert!(!engine.store().roster("T2").unwrap().contains("P1"));

    // Losing by omission: failed, but with no reason
    let lost = engine.store().claim(loser.id()).unwrap().unwrap();
    assert_eq!(lost.status(), &ClaimStatus::Failed);
    assert_eq!(lost.failure_reason(), None);
    assert!(result.failed_claims.is_empty());
}

#[test]
fn test_tied_bids_fall_back_to_waiver_priority() {
    // Default settings use the `priority` tiebreak. Claims go through
    // submit_claim so each carries its team's rank snapshot.
    let store = MemoryStore::new();
    store.put_league("L1", WaiverSettings::default());
    for (team, rank) in [("FRONT", 1), ("BACK", 2)] {
        store.set_budget("L1", team, 10_000);
        store.put_priority("L1", WaiverPriority::new(team, team, rank));
        store.put_roster(Roster::new(team, vec![], 15));
    }
    let engine = WaiverEngine::new(store, NullPublisher);

    let request = |team: &str| ClaimRequest {
        league_id: "L1".to_string(),
        team_id: team.to_string(),
        player_id: "P1".to_string(),
        player_name: "Player One".to_string(),
        position: "RB".to_string(),
        drop_player_id: None,
        drop_player_name: None,
        bid_amount: Some(4_000), // $40 each
    };

    // Worse-ranked team submits first; rank must still decide the tie
    let early = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 30).unwrap();
    engine.submit_claim(request("BACK"), early).unwrap();
    engine.submit_claim(request("FRONT"), late).unwrap();

    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.successful_claims, 1);
    assert_eq!(result.processed_claims[0].team_id, "FRONT");
    assert!(engine.store().roster("FRONT").unwrap().contains("P1"));
}

#[test]
fn test_tied_bids_fall_back_to_submission_time() {
    let store = auction_store();
    store.set_budget("L1", "EARLY", 10_000);
    store.set_budget("L1", "LATE", 10_000);
    store.put_roster(Roster::new("EARLY", vec![], 15));
    store.put_roster(Roster::new("LATE", vec![], 15));

    store.persist_claim(&claim("LATE", "P1", 4_000, 30)).unwrap();
    store.persist_claim(&claim("EARLY", "P1", 4_000, 10)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.processed_claims[0].team_id, "EARLY");
}

// ============================================================================
// Scenario: budget shrinks mid-run
// ============================================================================

#[test]
fn test_earlier_win_shrinks_budget_for_later_group() {
    let store = auction_store();
    store.set_budget("L1", "T1", 10_000);
    store.set_budget("L1", "T2", 1_000);
    store.put_roster(Roster::new("T1", vec![], 15));
    store.put_roster(Roster::new("T2", vec![], 15));

    // Groups settle in ascending player id order: PA before PB.
    // T1 can afford either bid alone, but not both.
    store.persist_claim(&claim("T1", "PA", 7_000, 0)).unwrap();
    store.persist_claim(&claim("T1", "PB", 7_000, 1)).unwrap();
    store.persist_claim(&claim("T2", "PB", 1_000, 2)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    // T1 wins PA, then lacks budget for PB; PB falls to T2
    assert_eq!(result.stats.successful_claims, 2);
    assert_eq!(result.failed_claims.len(), 1);
    assert_eq!(result.failed_claims[0].team_id, "T1");
    assert_eq!(result.failed_claims[0].reason, "Insufficient FAAB budget");

    let budgets = engine.store().team_budgets("L1").unwrap();
    assert_eq!(budgets["T1"], 3_000);
    assert_eq!(budgets["T2"], 0);

    assert!(engine.store().roster("T2").unwrap().contains("PB"));
}

// ============================================================================
// Scenario: roster constraints
// ============================================================================

#[test]
fn test_full_roster_without_drop_fails_and_next_bid_wins() {
    let store = auction_store();
    store.set_budget("L1", "FULL", 10_000);
    store.set_budget("L1", "OPEN", 10_000);
    store.put_roster(Roster::new("FULL", vec!["x1".into(), "x2".into()], 2));
    store.put_roster(Roster::new("OPEN", vec![], 2));

    store.persist_claim(&claim("FULL", "P1", 9_000, 0)).unwrap();
    store.persist_claim(&claim("OPEN", "P1", 2_000, 1)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.failed_claims.len(), 1);
    assert_eq!(
        result.failed_claims[0].reason,
        "No roster space and no drop player specified"
    );
    assert_eq!(result.processed_claims[0].team_id, "OPEN");

    // The rejected bid is never debited
    assert_eq!(engine.store().team_budgets("L1").unwrap()["FULL"], 10_000);
}

#[test]
fn test_full_roster_with_drop_wins_atomically() {
    let store = auction_store();
    store.set_budget("L1", "T1", 10_000);
    store.put_roster(Roster::new("T1", vec!["old_guy".into()], 1));

    let with_drop = claim("T1", "P1", 3_000, 0).with_drop_player("old_guy", "Old Guy");
    store.persist_claim(&with_drop).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.successful_claims, 1);
    assert_eq!(
        result.roster_moves[0].dropped_player_id.as_deref(),
        Some("old_guy")
    );
    assert_eq!(result.roster_moves[0].acquisition_type, "waiver");
    assert_eq!(result.roster_moves[0].acquisition_cost, 3_000);

    let roster = engine.store().roster("T1").unwrap();
    assert!(roster.contains("P1"));
    assert!(!roster.contains("old_guy"));
}

// ============================================================================
// Run bookkeeping
// ============================================================================

#[test]
fn test_settled_claims_never_reenter_a_batch() {
    let store = auction_store();
    store.set_budget("L1", "T1", 10_000);
    store.put_roster(Roster::new("T1", vec![], 15));
    store.persist_claim(&claim("T1", "P1", 2_000, 0)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let first = engine.run_settlement("L1", run_time()).unwrap();
    assert_eq!(first.stats.successful_claims, 1);

    // Same claim must not settle twice
    let second = engine.run_settlement("L1", run_time()).unwrap();
    assert_eq!(second.stats.total_claims, 0);
    assert_eq!(engine.store().team_budgets("L1").unwrap()["T1"], 8_000);
}

#[test]
fn test_zero_bid_can_win_when_allowed() {
    let store = auction_store();
    store.set_budget("L1", "T1", 10_000);
    store.put_roster(Roster::new("T1", vec![], 15));
    store.persist_claim(&claim("T1", "P1", 0, 0)).unwrap();

    let engine = WaiverEngine::new(store, NullPublisher);
    let result = engine.run_settlement("L1", run_time()).unwrap();

    assert_eq!(result.stats.successful_claims, 1);
    assert_eq!(result.stats.total_faab_spent, 0);
    assert_eq!(engine.store().team_budgets("L1").unwrap()["T1"], 10_000);
}
