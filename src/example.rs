//! Training example generation and target transformations.

use rand::Rng;

use crate::{
    Config,
    config::check_boundary_draw,
    error::{Error, Result},
    sampler::{sample, sample_value}
};

/// # Overview
///
/// A pure transformation from an input vector to its target output.
///
/// Implemented by [`Task`] and by any `Fn(&[u8], &mut [u8])`, so a new target
/// plugs in without touching the rest of the pipeline.
///
/// # Examples
///
/// ```
/// use chainvote::Target;
///
/// let reverse = |input: &[u8], output: &mut [u8]| {
///     for (o, i) in output.iter_mut().zip(input.iter().rev()) {
///         *o = *i;
///     }
/// };
///
/// let mut out = [0u8; 3];
/// reverse.apply(&[1, 2, 3], &mut out);
/// assert_eq!(out, [3, 2, 1]);
/// ```
pub trait Target {
    /// Writes the target for `input` into `output`.
    fn apply(&self, input: &[u8], output: &mut [u8]);
}

impl<F> Target for F
where
    F: Fn(&[u8], &mut [u8])
{
    #[inline]
    fn apply(&self, input: &[u8], output: &mut [u8]) {
        self(input, output)
    }
}

/// # Overview
///
/// Built-in target transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Ascending sort of the input prefix that fits the output. Output slots
    /// past the input length are zero.
    Sort,
    /// [`Task::Sort`], then the first output slot becomes
    /// `input[0] + input[1]`, saturated at `cap`.
    SortedSum { cap: u8 }
}

impl Target for Task {
    fn apply(&self, input: &[u8], output: &mut [u8]) {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        output[..n].sort_unstable();
        output[n..].fill(0);

        if let Self::SortedSum {
            cap
        } = *self
            && let Some(first) = output.first_mut()
        {
            let sum: u16 = input.iter().take(2).map(|&v| v as u16).sum();
            *first = sum.min(cap as u16) as u8;
        }
    }
}

/// # Overview
///
/// Kind of input produced by [`ExampleGenerator::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// Every value is 0.
    Minimum,
    /// Every value is the input maximum.
    Maximum,
    /// Every value drawn independently.
    Random
}

/// # Overview
///
/// Draws training inputs, forcing all-minimum and all-maximum vectors with a
/// small fixed probability.
///
/// With the default boundary draw of 8 the sampler's endpoint bias gives
/// all-minimum inputs probability 1/14 and all-maximum inputs 1/7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleGenerator {
    input_max:     u8,
    boundary_draw: usize
}

impl ExampleGenerator {
    /// # Overview
    ///
    /// Generator for values in `[0, input_max]`.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroValueMax`] if `input_max` is zero,
    /// [`Error::InvalidBoundaryDraw`] if `boundary_draw` is 1 or 2.
    pub fn new(input_max: u8, boundary_draw: usize) -> Result<Self> {
        if input_max == 0 {
            return Err(Error::ZeroValueMax);
        }
        check_boundary_draw(boundary_draw)?;
        Ok(Self {
            input_max,
            boundary_draw
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.input_max, config.boundary_draw)
    }

    /// # Overview
    ///
    /// Fills `input` with a training input and reports which kind it is.
    pub fn fill<R: Rng>(&self, rng: &mut R, input: &mut [u8]) -> Result<ExampleKind> {
        if self.boundary_draw > 0 {
            match sample(rng, self.boundary_draw)? {
                0 => {
                    input.fill(0);
                    return Ok(ExampleKind::Minimum);
                }
                1 => {
                    input.fill(self.input_max);
                    return Ok(ExampleKind::Maximum);
                }
                _ => {}
            }
        }
        self.fill_random(rng, input)?;
        Ok(ExampleKind::Random)
    }

    /// # Overview
    ///
    /// Fills `input` with independently drawn values in `[0, input_max]`.
    pub fn fill_random<R: Rng>(&self, rng: &mut R, input: &mut [u8]) -> Result<()> {
        for value in input.iter_mut() {
            *value = sample_value(rng, self.input_max)?;
        }
        Ok(())
    }
}
