//! Chain - one weak predictor over sampled input and output bits.

use rand::Rng;
use smallvec::SmallVec;

use crate::{
    Config, OutputSampling, ThresholdMode,
    encoder::{Code, MAX_BITS, code_bit, code_space, encode, rescale, shared_threshold},
    error::{Error, Result},
    sampler::sample,
    vote::VoteTally
};

type Locations = SmallVec<[usize; MAX_BITS]>;
type Thresholds = SmallVec<[u8; MAX_BITS]>;

/// # Overview
///
/// Finalized prediction of a chain for one input code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Most frequently observed output code.
    Predicted(Code),
    /// The input code never occurred in training.
    Abstain
}

impl Transition {
    #[inline]
    pub fn code(self) -> Option<Code> {
        match self {
            Self::Predicted(code) => Some(code),
            Self::Abstain => None
        }
    }
}

/// # Overview
///
/// A chain samples `bits` input and output locations with a threshold each,
/// counts how often every input code co-occurs with every output code, and
/// after finalization maps each input code to its most frequent output code.
///
/// - `stats[in_code * n_codes + out_code]` holds co-occurrence counts
/// - `transitions[in_code]` is filled by [`Chain::finalize`]
///
/// # Examples
///
/// ```
/// use chainvote::{Chain, Transition};
///
/// let mut chain = Chain::from_parts(
///     vec![0, 1], vec![8, 8], vec![0, 1], vec![8, 8], 2, 2
/// ).unwrap();
///
/// chain.observe(&[9, 0], &[0, 9]).unwrap();
/// chain.finalize(true);
///
/// assert_eq!(chain.predict(&[9, 0]), Ok(Transition::Predicted(0b10)));
/// assert_eq!(chain.predict(&[0, 0]), Ok(Transition::Abstain));
/// ```
#[derive(Debug, Clone)]
pub struct Chain {
    input_locations:   Locations,
    input_thresholds:  Thresholds,
    output_locations:  Locations,
    output_thresholds: Thresholds,
    input_len:         usize,
    output_len:        usize,
    stats:             Vec<u32>,
    transitions:       Vec<Transition>,
    finalized:         bool
}

impl Chain {
    /// # Overview
    ///
    /// Samples a fresh chain at position `ordinal` of the ensemble.
    ///
    /// Per bit, draws are taken in the order input location, output
    /// location, input threshold, output threshold. Thresholds that are
    /// shared or mirrored consume no draws.
    pub fn new<R: Rng>(config: &Config, ordinal: usize, rng: &mut R) -> Result<Self> {
        let bits = config.bits;
        let mut input_locations = Locations::with_capacity(bits);
        let mut input_thresholds = Thresholds::with_capacity(bits);
        let mut output_locations = Locations::with_capacity(bits);
        let mut output_thresholds = Thresholds::with_capacity(bits);

        let n_chains = config.n_chains();
        let mirrored = config.output_sampling == OutputSampling::Mirrored;

        for _ in 0..bits {
            let in_loc = sample(rng, config.input_len)?;
            let out_loc = if mirrored {
                in_loc
            } else {
                sample(rng, config.output_len)?
            };

            let (in_t, out_t) = match config.thresholds {
                ThresholdMode::PerBit => {
                    let in_t = sample(rng, config.input_max as usize)? as u8;
                    let out_t = if mirrored {
                        rescale(in_t, config.input_max, config.output_max)
                    } else {
                        sample(rng, config.output_max as usize)? as u8
                    };
                    (in_t, out_t)
                }
                ThresholdMode::Shared => (
                    shared_threshold(ordinal, n_chains, config.input_max),
                    shared_threshold(ordinal, n_chains, config.output_max)
                )
            };

            input_locations.push(in_loc);
            output_locations.push(out_loc);
            input_thresholds.push(in_t);
            output_thresholds.push(out_t);
        }

        Ok(Self::assemble(
            input_locations,
            input_thresholds,
            output_locations,
            output_thresholds,
            config.input_len,
            config.output_len
        ))
    }

    /// # Overview
    ///
    /// Builds a chain from explicit locations and thresholds.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBits`] if the bit width is zero, too wide, or differs
    /// between the four slices; [`Error::LocationOutOfRange`] if a location
    /// does not index its vector.
    pub fn from_parts(
        input_locations: Vec<usize>,
        input_thresholds: Vec<u8>,
        output_locations: Vec<usize>,
        output_thresholds: Vec<u8>,
        input_len: usize,
        output_len: usize
    ) -> Result<Self> {
        let bits = input_locations.len();
        if bits == 0
            || bits > MAX_BITS
            || input_thresholds.len() != bits
            || output_locations.len() != bits
            || output_thresholds.len() != bits
        {
            return Err(Error::InvalidBits {
                bits
            });
        }
        check_locations(&input_locations, input_len)?;
        check_locations(&output_locations, output_len)?;

        Ok(Self::assemble(
            input_locations.into(),
            input_thresholds.into(),
            output_locations.into(),
            output_thresholds.into(),
            input_len,
            output_len
        ))
    }

    fn assemble(
        input_locations: Locations,
        input_thresholds: Thresholds,
        output_locations: Locations,
        output_thresholds: Thresholds,
        input_len: usize,
        output_len: usize
    ) -> Self {
        let n_codes = code_space(input_locations.len());
        Self {
            input_locations,
            input_thresholds,
            output_locations,
            output_thresholds,
            input_len,
            output_len,
            stats: vec![0; n_codes * n_codes],
            transitions: Vec::new(),
            finalized: false
        }
    }

    #[inline(always)]
    pub fn bits(&self) -> usize {
        self.input_locations.len()
    }

    #[inline(always)]
    pub fn n_codes(&self) -> usize {
        code_space(self.bits())
    }

    #[inline]
    pub fn input_locations(&self) -> &[usize] {
        &self.input_locations
    }

    #[inline]
    pub fn input_thresholds(&self) -> &[u8] {
        &self.input_thresholds
    }

    #[inline]
    pub fn output_locations(&self) -> &[usize] {
        &self.output_locations
    }

    #[inline]
    pub fn output_thresholds(&self) -> &[u8] {
        &self.output_thresholds
    }

    /// Length of the input vectors this chain reads.
    #[inline]
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Length of the output vectors this chain reads and votes on.
    #[inline]
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// # Overview
    ///
    /// Largest sampled input location.
    pub fn max_input_location(&self) -> usize {
        self.input_locations.iter().copied().max().unwrap_or(0)
    }

    /// # Overview
    ///
    /// Largest sampled output location.
    pub fn max_output_location(&self) -> usize {
        self.output_locations.iter().copied().max().unwrap_or(0)
    }

    /// # Overview
    ///
    /// Code of an input vector.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `input` is not `input_len` long.
    #[inline]
    pub fn input_code(&self, input: &[u8]) -> Result<Code> {
        check_len(self.input_len, input.len())?;
        Ok(encode(input, &self.input_locations, &self.input_thresholds))
    }

    /// # Overview
    ///
    /// Code of an output vector.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `output` is not `output_len` long.
    #[inline]
    pub fn output_code(&self, output: &[u8]) -> Result<Code> {
        check_len(self.output_len, output.len())?;
        Ok(encode(output, &self.output_locations, &self.output_thresholds))
    }

    /// # Overview
    ///
    /// Counts of every output code observed with `in_code`.
    #[inline]
    pub fn stats_row(&self, in_code: Code) -> &[u32] {
        let n = self.n_codes();
        let start = in_code as usize * n;
        &self.stats[start..start + n]
    }

    /// # Overview
    ///
    /// Records one co-occurrence of `in_code` and `out_code`.
    ///
    /// Counts saturate at `u32::MAX` and never decrease.
    pub fn record(&mut self, in_code: Code, out_code: Code) -> Result<()> {
        if self.finalized {
            return Err(Error::AlreadyFinalized);
        }
        let n = self.n_codes();
        debug_assert!((in_code as usize) < n && (out_code as usize) < n);
        let cell = &mut self.stats[in_code as usize * n + out_code as usize];
        *cell = cell.saturating_add(1);
        Ok(())
    }

    /// # Overview
    ///
    /// Trains on one example pair.
    #[inline]
    pub fn observe(&mut self, input: &[u8], output: &[u8]) -> Result<()> {
        let in_code = self.input_code(input)?;
        let out_code = self.output_code(output)?;
        self.record(in_code, out_code)
    }

    /// # Overview
    ///
    /// Picks the most frequent output code for every input code.
    ///
    /// Ties go to the lowest output code. A row with no observations becomes
    /// [`Transition::Abstain`] when `abstain` is set, otherwise
    /// `Predicted(0)`. Recomputes from the statistics, so repeated calls give
    /// the same table.
    pub fn finalize(&mut self, abstain: bool) {
        let n = self.n_codes();
        let transitions = self
            .stats
            .chunks_exact(n)
            .map(|row| {
                let mut best_count = 0;
                let mut best_code = 0;
                for (code, &count) in row.iter().enumerate() {
                    if count > best_count {
                        best_count = count;
                        best_code = code;
                    }
                }
                if best_count == 0 && abstain {
                    Transition::Abstain
                } else {
                    Transition::Predicted(best_code as Code)
                }
            })
            .collect();

        self.transitions = transitions;
        self.finalized = true;
    }

    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// # Overview
    ///
    /// Transition for an input vector. Abstains before finalization.
    #[inline]
    pub fn predict(&self, input: &[u8]) -> Result<Transition> {
        let in_code = self.input_code(input)?;
        Ok(self
            .transitions
            .get(in_code as usize)
            .copied()
            .unwrap_or(Transition::Abstain))
    }

    /// # Overview
    ///
    /// Adds this chain's predicted output bits to `tally`.
    ///
    /// Returns `false` if the chain abstained.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `input` or `tally` does not match the
    /// chain's vector lengths.
    #[inline]
    pub fn vote(&self, input: &[u8], tally: &mut VoteTally) -> Result<bool> {
        check_len(self.output_len, tally.len())?;
        let Some(code) = self.predict(input)?.code() else {
            return Ok(false);
        };
        for (i, &loc) in self.output_locations.iter().enumerate() {
            tally.cast(loc, code_bit(code, i));
        }
        Ok(true)
    }

    /// # Overview
    ///
    /// Number of input codes that abstain.
    pub fn abstain_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| **t == Transition::Abstain)
            .count()
    }
}

#[inline]
pub(crate) fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::DimensionMismatch {
            expected,
            got
        });
    }
    Ok(())
}

fn check_locations(locations: &[usize], len: usize) -> Result<()> {
    match locations.iter().find(|&&loc| loc >= len) {
        Some(&location) => Err(Error::LocationOutOfRange {
            location,
            len
        }),
        None => Ok(())
    }
}
