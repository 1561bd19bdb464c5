//! Configuration, builder and presets for a chain ensemble.

use crate::{
    MAX_BITS, Task,
    error::{Error, Result},
    vote::VotePolicy
};

/// # Overview
///
/// How a chain picks its per-bit thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Every bit draws its own threshold.
    #[default]
    PerBit,
    /// One threshold per chain, spread evenly over the value range by the
    /// chain's ordinal.
    Shared
}

/// # Overview
///
/// How a chain picks its output locations and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSampling {
    /// Output locations and thresholds are drawn independently.
    #[default]
    Independent,
    /// Output bits reuse the input locations; thresholds are rescaled to the
    /// output range. Requires equal input and output lengths.
    Mirrored
}

/// # Overview
///
/// Configuration parameters for an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Config {
    pub input_len:        usize,
    pub output_len:       usize,
    pub bits:             usize,
    pub chains_per_input: usize,
    pub input_max:        u8,
    pub output_max:       u8,
    pub abstain:          bool,
    pub thresholds:       ThresholdMode,
    pub output_sampling:  OutputSampling,
    pub boundary_draw:    usize,
    pub empty_vote:       VotePolicy
}

impl Config {
    /// # Overview
    ///
    /// Creates a new ConfigBuilder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.input_len == 0 {
            return Err(Error::MissingInputLen);
        }
        if self.output_len == 0 {
            return Err(Error::MissingOutputLen);
        }
        if self.bits == 0 || self.bits > MAX_BITS {
            return Err(Error::InvalidBits {
                bits: self.bits
            });
        }
        if self.chains_per_input == 0 {
            return Err(Error::ZeroChains);
        }
        if self.input_len.checked_mul(self.chains_per_input).is_none() {
            return Err(Error::TooManyChains {
                input_len:        self.input_len,
                chains_per_input: self.chains_per_input
            });
        }
        if self.input_max == 0 || self.output_max == 0 {
            return Err(Error::ZeroValueMax);
        }
        if self.output_sampling == OutputSampling::Mirrored && self.input_len != self.output_len {
            return Err(Error::MirrorLengthMismatch {
                input:  self.input_len,
                output: self.output_len
            });
        }
        check_boundary_draw(self.boundary_draw)
    }

    /// # Overview
    ///
    /// Total number of chains: a multiple of the input length, so every
    /// input location expects the same number of sampled bits.
    ///
    /// Saturates on configs that [`Config::validate`] rejects.
    #[inline]
    #[must_use]
    pub fn n_chains(&self) -> usize {
        self.input_len.saturating_mul(self.chains_per_input)
    }

    /// # Overview
    ///
    /// Number of distinct codes per chain (`2^bits`).
    #[inline]
    #[must_use]
    pub fn n_codes(&self) -> usize {
        crate::encoder::code_space(self.bits)
    }

    /// # Overview
    ///
    /// Configuration for a named preset.
    pub fn preset(preset: Preset) -> Self {
        let builder = Config::builder().input_len(2);
        let builder = match preset {
            Preset::SharedSort => builder
                .output_len(2)
                .bits(6)
                .thresholds(ThresholdMode::Shared)
                .abstain(false),
            Preset::Sort => builder.output_len(2).bits(8),
            Preset::Sum => builder.output_len(1).bits(6).input_max(127).output_max(255)
        };
        builder.build_unchecked()
    }
}

/// Draws `1` and `2` would make every example a boundary example.
pub(crate) fn check_boundary_draw(draw: usize) -> Result<()> {
    if matches!(draw, 1 | 2) {
        return Err(Error::InvalidBoundaryDraw {
            draw
        });
    }
    Ok(())
}

/// # Overview
///
/// Observed configurations, each paired with its target transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Two-element sort, 6-bit chains, one threshold per chain, no abstain.
    SharedSort,
    /// Two-element sort, 8-bit chains, per-bit thresholds.
    Sort,
    /// Sum of two 7-bit values into one byte, 6-bit chains.
    Sum
}

impl Preset {
    /// # Overview
    ///
    /// Target transformation this preset learns.
    pub fn task(self) -> Task {
        match self {
            Self::SharedSort | Self::Sort => Task::Sort,
            Self::Sum => Task::SortedSum {
                cap: Config::preset(self).output_max
            }
        }
    }
}

/// # Overview
///
/// Builder for Config with validation.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input_len:        Option<usize>,
    output_len:       Option<usize>,
    bits:             Option<usize>,
    chains_per_input: Option<usize>,
    input_max:        Option<u8>,
    output_max:       Option<u8>,
    abstain:          Option<bool>,
    thresholds:       Option<ThresholdMode>,
    output_sampling:  Option<OutputSampling>,
    boundary_draw:    Option<usize>,
    empty_vote:       Option<VotePolicy>
}

impl ConfigBuilder {
    /// # Overview
    ///
    /// Sets the input vector length.
    pub fn input_len(mut self, n: usize) -> Self {
        self.input_len = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the output vector length.
    pub fn output_len(mut self, n: usize) -> Self {
        self.output_len = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the chain bit width (default: 6).
    pub fn bits(mut self, n: usize) -> Self {
        self.bits = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets chains per input location (default: 255).
    pub fn chains_per_input(mut self, n: usize) -> Self {
        self.chains_per_input = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the largest input value (default: 255).
    pub fn input_max(mut self, max: u8) -> Self {
        self.input_max = Some(max);
        self
    }

    /// # Overview
    ///
    /// Sets the largest output value (default: 255).
    pub fn output_max(mut self, max: u8) -> Self {
        self.output_max = Some(max);
        self
    }

    /// # Overview
    ///
    /// Lets chains abstain on codes never seen in training (default: true).
    pub fn abstain(mut self, enabled: bool) -> Self {
        self.abstain = Some(enabled);
        self
    }

    pub fn thresholds(mut self, mode: ThresholdMode) -> Self {
        self.thresholds = Some(mode);
        self
    }

    pub fn output_sampling(mut self, mode: OutputSampling) -> Self {
        self.output_sampling = Some(mode);
        self
    }

    /// # Overview
    ///
    /// Sets the range of the boundary draw (default: 8). A draw of `0` forces
    /// an all-minimum example, `1` an all-maximum one. `0` disables boundary
    /// examples entirely.
    pub fn boundary_draw(mut self, n: usize) -> Self {
        self.boundary_draw = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets what decoding does with an output location nobody voted on.
    pub fn empty_vote(mut self, policy: VotePolicy) -> Self {
        self.empty_vote = Some(policy);
        self
    }

    fn build_unchecked(self) -> Config {
        Config {
            input_len:        self.input_len.unwrap_or(0),
            output_len:       self.output_len.unwrap_or(0),
            bits:             self.bits.unwrap_or(6),
            chains_per_input: self.chains_per_input.unwrap_or(255),
            input_max:        self.input_max.unwrap_or(u8::MAX),
            output_max:       self.output_max.unwrap_or(u8::MAX),
            abstain:          self.abstain.unwrap_or(true),
            thresholds:       self.thresholds.unwrap_or_default(),
            output_sampling:  self.output_sampling.unwrap_or_default(),
            boundary_draw:    self.boundary_draw.unwrap_or(8),
            empty_vote:       self.empty_vote.unwrap_or_default()
        }
    }

    /// # Overview
    ///
    /// Builds and validates the Config.
    pub fn build(self) -> Result<Config> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }
}
