//! Random streams for flow nodes and for the host's ambient generator.
//!
//! # Two kinds of randomness
//!
//! - [`FlowRng`] is private to one node instance.  It is seeded from
//!   `combine_seeds(asset_seed, node_seed)` when the node activates, so a
//!   graph replayed with the same asset seed rolls the same outcomes.
//!
//! - [`AmbientRng`] stands in for the host engine's global generator.  It is
//!   either seeded explicitly (reproducible runs, tests) or from OS entropy.
//!   Option reshuffles and guaranteed rolls draw from it, so they are only
//!   reproducible when it is seeded.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Combine two 32-bit seeds into one.  Order matters.
#[inline]
pub fn combine_seeds(a: u32, b: u32) -> u32 {
    let golden = (MIXING_CONSTANT >> 32) as u32;
    a ^ b
        .wrapping_add(golden)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

// ── FlowRng ───────────────────────────────────────────────────────────────────

/// Deterministic per-node random stream.
pub struct FlowRng(SmallRng);

impl FlowRng {
    pub fn new(seed: u32) -> Self {
        FlowRng(SmallRng::seed_from_u64((seed as u64).wrapping_mul(MIXING_CONSTANT)))
    }

    /// Re-seed in place, discarding the current sequence.
    pub fn initialize(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform in `[0, max)`, or `0` when `max <= 0`.
    #[inline]
    pub fn rand_helper(&mut self, max: i32) -> i32 {
        if max <= 0 { 0 } else { self.0.gen_range(0..max) }
    }

    /// [`rand_helper`](Self::rand_helper) over `i64`, for sums of `i32` weights.
    #[inline]
    pub fn rand_helper_wide(&mut self, max: i64) -> i64 {
        if max <= 0 { 0 } else { self.0.gen_range(0..max) }
    }

    /// Uniform in `[min, max]` (both inclusive).  Returns `min` if the range is empty.
    #[inline]
    pub fn rand_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min { min } else { self.0.gen_range(min..=max) }
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}

impl Default for FlowRng {
    fn default() -> Self {
        Self::new(0)
    }
}

// ── AmbientRng ────────────────────────────────────────────────────────────────

/// The host-global generator.
///
/// Single-threaded by construction: the host hands out `&mut AmbientRng`
/// from its own tick loop.
pub struct AmbientRng(SmallRng);

impl AmbientRng {
    pub fn new(seed: u64) -> Self {
        AmbientRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy; sequences differ from run to run.
    pub fn from_entropy() -> Self {
        AmbientRng(SmallRng::from_entropy())
    }

    /// Seeded when `seed` is `Some`, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform in `[0, max)`, or `0` when `max <= 0`.
    #[inline]
    pub fn rand_helper(&mut self, max: i32) -> i32 {
        if max <= 0 { 0 } else { self.0.gen_range(0..max) }
    }

    /// Uniform in `[min, max]` (both inclusive).  Returns `min` if the range is empty.
    #[inline]
    pub fn rand_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min { min } else { self.0.gen_range(min..=max) }
    }

    /// Derive a fresh [`FlowRng`] from the next ambient draw.
    pub fn fork_stream(&mut self) -> FlowRng {
        FlowRng::new(self.rand_helper(i32::MAX) as u32)
    }
}
