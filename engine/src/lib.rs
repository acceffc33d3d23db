//! Waiver Engine Core - Claim Settlement Engine
//!
//! Deterministic settlement of fantasy-league waiver claims under three
//! interchangeable allocation policies.
//!
//! # Architecture
//!
//! - **core**: Settlement scheduling (weekday/time math, run seeds)
//! - **models**: Domain types (WaiverClaim, WaiverSettings, WaiverPriority, Roster)
//! - **settlement**: Allocation policies (auction, rotation, reverse standings)
//! - **engine**: Claim intake, per-league locking, and the settlement run
//! - **store**: Persistence contract and in-memory reference store
//! - **publish**: Outcome notifications
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. At most one claim per player succeeds per settlement run
//! 4. At most one settlement run per league at any instant

// Module declarations
pub mod core;
pub mod engine;
pub mod models;
pub mod publish;
pub mod rng;
pub mod settlement;
pub mod store;

// Re-exports for convenience
pub use engine::{
    CancelError, ClaimRequest, LeagueLockGuard, LeagueLocks, SettlementError, SubmitError,
    WaiverEngine,
};
pub use models::{
    claim::{ClaimError, ClaimStatus, WaiverClaim},
    priority::WaiverPriority,
    roster::{Roster, RosterError},
    settings::{PolicyKind, Tiebreaker, WaiverSettings},
};
pub use publish::{ClaimSubmittedAck, OutcomePublisher};
pub use rng::RngManager;
pub use settlement::{group_by_player, policy_for, ClaimPolicy, FailureReason, SettlementResult};
pub use store::{LeagueStore, MemoryStore, RosterMoveOutcome, StoreError};
