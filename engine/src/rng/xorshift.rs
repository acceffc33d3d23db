//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG with 64-bit state and 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence. The `random` tiebreak rule is explicitly
//! non-reproducible across settlement runs, so each run seeds a fresh
//! generator; tests pin the seed to replay an exact shuffle.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use waiver_engine_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let mut order = vec![1, 2, 3, 4];
/// rng.shuffle(&mut order);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed
    ///
    /// # Example
    /// ```
    /// use waiver_engine_core::RngManager;
    ///
    /// let rng = RngManager::new(12345);
    /// ```
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random index in range [0, bound)
    ///
    /// # Panics
    /// Panics if bound is 0
    pub fn index(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        (self.next() % bound as u64) as usize
    }

    /// Shuffle a slice in place (Fisher-Yates)
    ///
    /// Used by the `random` tiebreak rule: a uniformly shuffled claim group,
    /// followed by a stable sort on the policy's primary key, leaves tied
    /// claims in uniformly random relative order.
    ///
    /// # Example
    /// ```
    /// use waiver_engine_core::RngManager;
    ///
    /// let mut a = RngManager::new(7);
    /// let mut b = RngManager::new(7);
    /// let mut xs = vec![1, 2, 3, 4, 5];
    /// let mut ys = xs.clone();
    /// a.shuffle(&mut xs);
    /// b.shuffle(&mut ys);
    /// assert_eq!(xs, ys); // same seed, same order
    /// ```
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.index(i + 1);
            slice.swap(i, j);
        }
    }

    /// Get current RNG state (for replay)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
