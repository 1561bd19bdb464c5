//! Pipeline context: ensemble, target and scratch buffers in one place.

use rand::Rng;

use crate::{
    Config, Ensemble,
    error::Result,
    example::{ExampleGenerator, ExampleKind, Target},
    training::{TrainOptions, TrainReport, train},
    utils::rng_from_seed,
    vote::VoteTally
};

/// # Overview
///
/// Accuracy of a trained approximator over random inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Number of inputs evaluated.
    pub trials:  usize,
    /// Fraction of predictions equal to the target.
    pub exact:   f64,
    /// Fraction of predictions whose values are non-decreasing wherever the
    /// target is.
    pub ordered: f64,
    /// Mean absolute error per output value.
    pub mae:     f64
}

/// # Overview
///
/// Learns a [`Target`] with an [`Ensemble`].
///
/// Runs the four stages: [`Approximator::new`] samples the chains,
/// [`Approximator::train_example`] (or [`Approximator::fit`]) accumulates
/// statistics, [`Approximator::finalize`] freezes them, and
/// [`Approximator::predict`] votes.
///
/// # Examples
///
/// ```
/// use chainvote::{Approximator, Config, Task};
///
/// let config = Config::builder()
///     .input_len(2)
///     .output_len(2)
///     .chains_per_input(16)
///     .build()
///     .unwrap();
///
/// let mut approx = Approximator::with_seed(config, Task::Sort, 42).unwrap();
/// approx.fit(2_000, 42).unwrap();
///
/// let guess = approx.predict(&[200, 10]).unwrap();
/// assert_eq!(guess.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Approximator<T> {
    ensemble:   Ensemble,
    target:     T,
    generator:  ExampleGenerator,
    input:      Vec<u8>,
    output:     Vec<u8>,
    tally:      VoteTally,
    prediction: Vec<u8>
}

impl<T: Target> Approximator<T> {
    /// # Overview
    ///
    /// Samples a fresh ensemble for `config` from `rng`.
    pub fn new<R: Rng>(config: Config, target: T, rng: &mut R) -> Result<Self> {
        let ensemble = Ensemble::new(config, rng)?;
        Self::from_ensemble(ensemble, target)
    }

    /// # Overview
    ///
    /// Samples a fresh ensemble from a seeded RNG.
    pub fn with_seed(config: Config, target: T, seed: u64) -> Result<Self> {
        Self::new(config, target, &mut rng_from_seed(seed))
    }

    /// # Overview
    ///
    /// Wraps an existing ensemble.
    pub fn from_ensemble(ensemble: Ensemble, target: T) -> Result<Self> {
        let config = *ensemble.config();
        Ok(Self {
            generator: ExampleGenerator::from_config(&config)?,
            input: vec![0; config.input_len],
            output: vec![0; config.output_len],
            tally: VoteTally::new(config.output_len),
            prediction: vec![0; config.output_len],
            ensemble,
            target
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        self.ensemble.config()
    }

    #[inline]
    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    #[inline]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[inline]
    pub fn generator(&self) -> &ExampleGenerator {
        &self.generator
    }

    /// # Overview
    ///
    /// Trains on one example pair supplied by the caller.
    pub fn observe(&mut self, input: &[u8], output: &[u8]) -> Result<()> {
        self.ensemble.observe(input, output)
    }

    /// # Overview
    ///
    /// Generates one example, applies the target and trains on it.
    pub fn train_example<R: Rng>(&mut self, rng: &mut R) -> Result<ExampleKind> {
        let kind = self.generator.fill(rng, &mut self.input)?;
        self.target.apply(&self.input, &mut self.output);
        self.ensemble.observe(&self.input, &self.output)?;
        Ok(kind)
    }

    /// # Overview
    ///
    /// Freezes every chain's transition table.
    pub fn finalize(&mut self) {
        self.ensemble.finalize();
    }

    /// Simple training: `examples` generated examples, then finalization.
    ///
    /// # Arguments
    ///
    /// * `examples` - Number of training examples
    /// * `seed` - Random seed for reproducibility
    pub fn fit(&mut self, examples: usize, seed: u64) -> Result<TrainReport> {
        self.fit_with_options(TrainOptions::new(examples, seed))
    }

    /// Training with full options including progress callbacks.
    ///
    /// # Returns
    ///
    /// [`TrainReport`] with training statistics.
    pub fn fit_with_options(&mut self, mut opts: TrainOptions) -> Result<TrainReport> {
        let mut rng = rng_from_seed(opts.seed);
        self.fit_with_rng(&mut opts, &mut rng)
    }

    /// Training driven by a caller-supplied RNG. `opts.seed` is not used.
    pub fn fit_with_rng<R: Rng>(
        &mut self,
        opts: &mut TrainOptions,
        rng: &mut R
    ) -> Result<TrainReport> {
        train(
            &mut self.ensemble,
            &self.generator,
            &self.target,
            opts,
            rng,
            &mut self.input,
            &mut self.output
        )
    }

    /// # Overview
    ///
    /// Predicted output for `input`.
    ///
    /// The returned slice is the approximator's output buffer, so under
    /// [`VotePolicy::Hold`] silent locations keep the previous prediction.
    ///
    /// [`VotePolicy::Hold`]: crate::VotePolicy::Hold
    pub fn predict(&mut self, input: &[u8]) -> Result<&[u8]> {
        self.ensemble
            .predict_into(input, &mut self.tally, &mut self.prediction)?;
        Ok(&self.prediction)
    }

    /// # Overview
    ///
    /// Vote tally left by the last [`Approximator::predict`].
    #[inline]
    pub fn last_tally(&self) -> &VoteTally {
        &self.tally
    }

    /// # Overview
    ///
    /// Ground-truth output for `input`.
    pub fn answer(&self, input: &[u8]) -> Vec<u8> {
        let mut output = vec![0; self.config().output_len];
        self.target.apply(input, &mut output);
        output
    }

    /// # Overview
    ///
    /// Draws a random (non-boundary) input.
    pub fn random_input<R: Rng>(&self, rng: &mut R) -> Result<Vec<u8>> {
        let mut input = vec![0; self.config().input_len];
        self.generator.fill_random(rng, &mut input)?;
        Ok(input)
    }

    /// # Overview
    ///
    /// Compares predictions with the target on `trials` random inputs.
    pub fn evaluate<R: Rng>(&mut self, trials: usize, rng: &mut R) -> Result<Evaluation> {
        if trials == 0 {
            return Ok(Evaluation {
                trials,
                exact: 0.0,
                ordered: 0.0,
                mae: 0.0
            });
        }

        let mut exact = 0usize;
        let mut ordered = 0usize;
        let mut abs_error = 0u64;

        for _ in 0..trials {
            let input = self.random_input(rng)?;
            let answer = self.answer(&input);
            let guess = self.predict(&input)?;

            if guess == answer.as_slice() {
                exact += 1;
            }
            if same_order(guess, &answer) {
                ordered += 1;
            }
            abs_error += guess
                .iter()
                .zip(&answer)
                .map(|(&g, &a)| (g as i32 - a as i32).unsigned_abs() as u64)
                .sum::<u64>();
        }

        let values = (trials * self.config().output_len) as f64;
        Ok(Evaluation {
            trials,
            exact: exact as f64 / trials as f64,
            ordered: ordered as f64 / trials as f64,
            mae: abs_error as f64 / values
        })
    }
}

fn same_order(guess: &[u8], answer: &[u8]) -> bool {
    guess
        .windows(2)
        .zip(answer.windows(2))
        .all(|(g, a)| (a[0] <= a[1]) == (g[0] <= g[1]))
}
