//! Bounded integer sampling by rounding a scaled uniform draw.

use rand::Rng;

use crate::{
    error::{Error, Result},
    utils::unit_f64
};

/// # Overview
///
/// Draws an integer in `[0, n)` as `round(U * (n - 1))` with `U` uniform in
/// `[0, 1)`.
///
/// The result is not uniform: `0` and `n - 1` each own half a rounding
/// bucket, so interior values are about twice as likely as the endpoints.
/// Location and threshold choices depend on this distribution.
///
/// `n == 1` returns `0` without consuming a draw.
///
/// # Errors
///
/// [`Error::EmptyRange`] when `n == 0`.
///
/// # Examples
///
/// ```
/// use chainvote::{sampler::sample, utils::rng_from_seed};
///
/// let mut rng = rng_from_seed(1);
/// let v = sample(&mut rng, 10).unwrap();
/// assert!(v < 10);
/// ```
#[inline]
pub fn sample<R: Rng>(rng: &mut R, n: usize) -> Result<usize> {
    match n {
        0 => Err(Error::EmptyRange),
        1 => Ok(0),
        _ => {
            let scaled = unit_f64(rng) * (n - 1) as f64;
            Ok((scaled.round() as usize).min(n - 1))
        }
    }
}

/// # Overview
///
/// Draws a byte value in `[0, max]`.
#[inline]
pub fn sample_value<R: Rng>(rng: &mut R, max: u8) -> Result<u8> {
    sample(rng, max as usize + 1).map(|v| v as u8)
}
