//! Domain models: claims, league settings, priorities, rosters

pub mod claim;
pub mod priority;
pub mod roster;
pub mod settings;

pub use claim::{ClaimError, ClaimStatus, WaiverClaim};
pub use priority::WaiverPriority;
pub use roster::{Roster, RosterError};
pub use settings::{PolicyKind, Tiebreaker, WaiverSettings};
