//! Bit encoder: axis-aligned threshold sketch of a byte vector.

/// A W-bit code produced by [`encode`].
pub type Code = u8;

/// Largest supported bit width.
///
/// A chain keeps a `2^W x 2^W` statistics matrix, so the width stays small.
pub const MAX_BITS: usize = 8;

/// # Overview
///
/// Sets bit `i` of the result iff `values[locations[i]] > thresholds[i]`.
///
/// Locations are trusted to be in range; chains check them at construction.
///
/// # Examples
///
/// ```
/// use chainvote::encoder::encode;
///
/// let code = encode(&[10, 200], &[0, 1, 1], &[5, 100, 250]);
/// assert_eq!(code, 0b011);
/// ```
#[inline]
pub fn encode(values: &[u8], locations: &[usize], thresholds: &[u8]) -> Code {
    debug_assert_eq!(locations.len(), thresholds.len());
    debug_assert!(locations.len() <= MAX_BITS);

    locations
        .iter()
        .zip(thresholds)
        .enumerate()
        .fold(0, |code, (i, (&loc, &t))| {
            if values[loc] > t { code | (1 << i) } else { code }
        })
}

/// # Overview
///
/// Returns bit `i` of `code`.
#[inline(always)]
pub fn code_bit(code: Code, i: usize) -> bool {
    (code >> i) & 1 == 1
}

/// # Overview
///
/// Number of distinct codes for a bit width.
#[inline(always)]
pub fn code_space(bits: usize) -> usize {
    1 << bits
}

/// # Overview
///
/// Threshold shared by every bit of chain `ordinal` out of `n_chains`:
/// `round(ordinal / (n_chains - 1) * max)`.
///
/// Thresholds run evenly from `0` for the first chain to `max` for the last.
/// A lone chain sits at the middle of the range.
#[inline]
pub fn shared_threshold(ordinal: usize, n_chains: usize, max: u8) -> u8 {
    if n_chains <= 1 {
        return (max as f64 / 2.0).round() as u8;
    }
    let t = ordinal as f64 / (n_chains - 1) as f64 * max as f64;
    t.round().min(max as f64) as u8
}

/// # Overview
///
/// Maps a threshold from `[0, from]` onto `[0, to]`.
#[inline]
pub fn rescale(value: u8, from: u8, to: u8) -> u8 {
    if from == to || from == 0 {
        return value.min(to);
    }
    (value as f64 * to as f64 / from as f64).round().min(to as f64) as u8
}
