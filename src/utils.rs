//! Random source helpers.
//!
//! Every component that needs randomness takes `&mut R where R: Rng`, so a
//! run is reproducible whenever the caller seeds the generator explicitly.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fast RNG used throughout the crate.
pub type FastRng = Xoshiro256PlusPlus;

/// # Overview
///
/// Creates a fast RNG seeded from a u64 value.
///
/// # Examples
///
/// ```
/// use chainvote::utils::rng_from_seed;
///
/// let mut rng = rng_from_seed(42);
/// ```
#[inline]
pub fn rng_from_seed(seed: u64) -> FastRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// # Overview
///
/// Creates a fast RNG with entropy from the thread-local RNG.
///
/// Runs started this way are not reproducible.
#[inline]
pub fn rng_from_entropy() -> FastRng {
    Xoshiro256PlusPlus::from_rng(&mut rand::rng())
}

/// # Overview
///
/// Generates a random f64 in [0, 1).
#[inline]
pub fn unit_f64<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}
