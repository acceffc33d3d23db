//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. The only randomness the engine ever needs
//! is the `random` tiebreak rule; all of it goes through this module so a
//! settlement run can be replayed exactly by pinning the seed.

mod xorshift;

pub use xorshift::RngManager;
