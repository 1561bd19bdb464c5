//! Training options, progress callbacks, and the training loop.

use rand::Rng;

use crate::{
    Ensemble,
    error::Result,
    example::{ExampleGenerator, ExampleKind, Target}
};

/// Progress callback type for training.
///
/// Called every `report_every` examples with the number of examples seen.
/// Return `false` to stop training early.
pub type ProgressCallback = Box<dyn FnMut(usize) -> bool + Send>;

/// Options for training an ensemble.
pub struct TrainOptions {
    pub examples:     usize,
    pub seed:         u64,
    pub report_every: usize,
    pub verbose:      bool,
    pub callback:     Option<ProgressCallback>
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            examples:     10_000,
            seed:         42,
            report_every: 1_000,
            verbose:      false,
            callback:     None
        }
    }
}

impl core::fmt::Debug for TrainOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TrainOptions")
            .field("examples", &self.examples)
            .field("seed", &self.seed)
            .field("report_every", &self.report_every)
            .field("verbose", &self.verbose)
            .field("callback", &self.callback.as_ref().map(|_| "..."))
            .finish()
    }
}

impl TrainOptions {
    /// Creates options with given example count and seed.
    #[must_use]
    pub fn new(examples: usize, seed: u64) -> Self {
        Self {
            examples,
            seed,
            ..Self::default()
        }
    }

    /// Logs progress at `info` level instead of `trace`.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Sets how many examples pass between progress reports.
    #[must_use]
    pub fn report_every(mut self, n: usize) -> Self {
        self.report_every = n;
        self
    }

    /// Sets progress callback.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let opts = TrainOptions::new(10_000, 42)
    ///     .with_callback(|seen| {
    ///         println!("{seen} examples");
    ///         true  // continue training
    ///     });
    /// ```
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) -> bool + Send + 'static
    {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Result of training.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Number of examples actually observed.
    pub examples_run:  usize,
    /// All-minimum boundary examples.
    pub minimum:       usize,
    /// All-maximum boundary examples.
    pub maximum:       usize,
    /// Randomly drawn examples.
    pub random:        usize,
    /// Whether the callback stopped training.
    pub stopped_early: bool,
    /// Fraction of (chain, code) pairs that abstain after finalization.
    pub abstain_ratio: f64
}

impl TrainReport {
    fn count(&mut self, kind: ExampleKind) {
        self.examples_run += 1;
        match kind {
            ExampleKind::Minimum => self.minimum += 1,
            ExampleKind::Maximum => self.maximum += 1,
            ExampleKind::Random => self.random += 1
        }
    }
}

/// # Overview
///
/// Trains `ensemble` on generated examples, then finalizes it.
///
/// `input` and `output` are scratch buffers of the configured lengths.
pub fn train<T, R>(
    ensemble: &mut Ensemble,
    generator: &ExampleGenerator,
    target: &T,
    opts: &mut TrainOptions,
    rng: &mut R,
    input: &mut [u8],
    output: &mut [u8]
) -> Result<TrainReport>
where
    T: Target + ?Sized,
    R: Rng
{
    ensemble.check_example(input, output)?;

    let mut report = TrainReport {
        examples_run:  0,
        minimum:       0,
        maximum:       0,
        random:        0,
        stopped_early: false,
        abstain_ratio: 0.0
    };

    for seen in 1..=opts.examples {
        let kind = generator.fill(rng, input)?;
        target.apply(input, output);
        ensemble.observe(input, output)?;
        report.count(kind);

        if opts.report_every > 0 && seen % opts.report_every == 0 {
            if opts.verbose {
                log::info!("trained on {seen}/{} examples", opts.examples);
            } else {
                log::trace!("trained on {seen}/{} examples", opts.examples);
            }

            if let Some(ref mut callback) = opts.callback
                && !callback(seen)
            {
                report.stopped_early = true;
                break;
            }
        }
    }

    ensemble.finalize();
    report.abstain_ratio = ensemble.abstain_ratio();

    log::info!(
        "training finished after {} examples ({} minimum, {} maximum), {:.1}% of codes abstain",
        report.examples_run,
        report.minimum,
        report.maximum,
        report.abstain_ratio * 100.0
    );

    Ok(report)
}
