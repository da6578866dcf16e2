//! Per-actor option allocation: which of N option sets the next actor gets.

use af_core::AmbientRng;
use tracing::debug;

/// How successive actors are assigned to the option pool.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentMethod {
    /// `0, 1, .., N-1, 0, 1, ..`
    #[default]
    InOrderWithWrapping,
    /// One shuffled order, repeated.
    ShuffledWithWrapping,
    /// A new shuffled order every cycle.
    ShuffledWithReshuffling,
}

/// Cursor over an ordering of option indices.
///
/// The ordering is built in identity order when a non-empty pool is first
/// seen, or first seen again after an empty one.  A pool that grows appends
/// the new indices to the ordering and a pool that shrinks drops the missing
/// ones; either way the cursor keeps its place.  Shuffles draw a fresh stream
/// from the ambient generator, so shuffled orders are reproducible only when
/// that generator is seeded.
#[derive(Clone, Debug, Default)]
pub struct OptionAllocator {
    indices: Vec<usize>,
    cursor:  Option<usize>,
}

impl OptionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index into a pool of `pool_len` options for the next actor, or `None`
    /// for an empty pool.
    pub fn next(&mut self, method: AssignmentMethod, pool_len: usize, ambient: &mut AmbientRng) -> Option<usize> {
        if pool_len == 0 {
            self.reset();
            return None;
        }
        self.ensure_indices(pool_len);

        let last = self.indices.len() - 1;
        let cursor = match self.cursor {
            Some(c) if c < last => c + 1,
            previous => {
                match method {
                    AssignmentMethod::InOrderWithWrapping => {}
                    AssignmentMethod::ShuffledWithWrapping => {
                        if previous.is_none() {
                            ambient.fork_stream().shuffle(&mut self.indices);
                        }
                    }
                    AssignmentMethod::ShuffledWithReshuffling => {
                        ambient.fork_stream().shuffle(&mut self.indices);
                    }
                }
                0
            }
        };
        self.cursor = Some(cursor);
        Some(self.indices[cursor])
    }

    /// The current ordering (empty before the first call).
    pub fn order(&self) -> &[usize] {
        &self.indices
    }

    pub fn reset(&mut self) {
        self.indices.clear();
        self.cursor = None;
    }

    fn ensure_indices(&mut self, pool_len: usize) {
        let old_len = self.indices.len();
        if old_len == pool_len {
            return;
        }
        if old_len == 0 {
            self.indices = (0..pool_len).collect();
            self.cursor = None;
            return;
        }

        debug!(old = old_len, new = pool_len, "option pool size changed");
        if pool_len > old_len {
            self.indices.extend(old_len..pool_len);
            return;
        }

        // Positions up to the cursor that survive the shrink.
        let consumed = self.cursor.map_or(0, |c| self.indices[..=c].iter().filter(|&&i| i < pool_len).count());
        self.indices.retain(|&i| i < pool_len);
        self.cursor = consumed.checked_sub(1);
    }
}
