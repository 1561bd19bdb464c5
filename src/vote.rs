//! Vote tally: per-output-location fractional votes and their decoding.

use crate::error::{Error, Result};

/// # Overview
///
/// What decoding emits for an output location that received no votes, either
/// because no chain samples it or because every sampling chain abstained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VotePolicy {
    /// Emit 0.
    #[default]
    Zero,
    /// Keep whatever value the output buffer already holds.
    Hold,
    /// Fail with [`Error::VoteUndefined`].
    Strict
}

/// # Overview
///
/// One `(sum, count)` pair per output location.
///
/// `sum` counts set bits, `count` counts every bit cast at that location, so
/// `sum <= count` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    sums:   Vec<u32>,
    counts: Vec<u32>
}

impl VoteTally {
    /// # Overview
    ///
    /// Creates an empty tally over `len` output locations.
    pub fn new(len: usize) -> Self {
        Self {
            sums:   vec![0; len],
            counts: vec![0; len]
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sums.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// # Overview
    ///
    /// Clears all votes. Call before each inference pass.
    pub fn reset(&mut self) {
        self.sums.fill(0);
        self.counts.fill(0);
    }

    /// # Overview
    ///
    /// Casts one bit vote at `location`.
    #[inline(always)]
    pub fn cast(&mut self, location: usize, bit: bool) {
        self.sums[location] += bit as u32;
        self.counts[location] += 1;
    }

    #[inline]
    pub fn sum(&self, location: usize) -> u32 {
        self.sums[location]
    }

    #[inline]
    pub fn count(&self, location: usize) -> u32 {
        self.counts[location]
    }

    /// # Overview
    ///
    /// Total bits cast across all locations.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// # Overview
    ///
    /// Fraction of set bits at `location`, in `[0, 1]`. `None` when nothing
    /// was cast there.
    #[inline]
    pub fn ratio(&self, location: usize) -> Option<f64> {
        let count = self.counts[location];
        if count == 0 {
            return None;
        }
        Some(self.sums[location] as f64 / count as f64)
    }

    /// # Overview
    ///
    /// Adds another tally into this one.
    pub fn merge(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            *a += b;
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
    }

    /// # Overview
    ///
    /// Writes `round(sum / count * max)` for every location into `out`.
    ///
    /// Locations without votes follow `policy`.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when `out` has the wrong length,
    /// [`Error::VoteUndefined`] for an empty location under
    /// [`VotePolicy::Strict`].
    pub fn decode(&self, max: u8, policy: VotePolicy, out: &mut [u8]) -> Result<()> {
        if out.len() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                got:      out.len()
            });
        }

        for (location, slot) in out.iter_mut().enumerate() {
            match self.ratio(location) {
                Some(r) => *slot = (r * max as f64).round() as u8,
                None => match policy {
                    VotePolicy::Zero => *slot = 0,
                    VotePolicy::Hold => {}
                    VotePolicy::Strict => return Err(Error::VoteUndefined {
                        location
                    })
                }
            }
        }
        Ok(())
    }
}
