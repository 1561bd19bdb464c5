//! Ensemble - a fixed-size collection of independently sampled chains.

use rand::Rng;

use crate::{
    Chain, Config,
    chain::check_len,
    error::{Error, Result},
    vote::VoteTally
};

/// # Overview
///
/// Owns `config.n_chains()` chains. Chain `i` is created with ordinal `i`.
///
/// Training goes through [`Ensemble::observe`], then [`Ensemble::finalize`]
/// freezes every chain and voting becomes available.
///
/// # Examples
///
/// ```
/// use chainvote::{Config, Ensemble, utils::rng_from_seed};
///
/// let config = Config::builder()
///     .input_len(2)
///     .output_len(2)
///     .chains_per_input(8)
///     .build()
///     .unwrap();
///
/// let mut rng = rng_from_seed(42);
/// let mut ensemble = Ensemble::new(config, &mut rng).unwrap();
///
/// ensemble.observe(&[30, 10], &[10, 30]).unwrap();
/// ensemble.finalize();
///
/// let out = ensemble.predict(&[30, 10]).unwrap();
/// assert_eq!(out.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Ensemble {
    chains:    Vec<Chain>,
    config:    Config,
    finalized: bool
}

impl Ensemble {
    /// # Overview
    ///
    /// Validates the config and samples every chain from `rng`.
    pub fn new<R: Rng>(config: Config, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let chains = (0..config.n_chains())
            .map(|ordinal| Chain::new(&config, ordinal, rng))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "sampled {} chains of {} bits ({} -> {} values)",
            chains.len(),
            config.bits,
            config.input_len,
            config.output_len
        );

        Ok(Self {
            chains,
            config,
            finalized: false
        })
    }

    /// # Overview
    ///
    /// Builds an ensemble from hand-made chains.
    ///
    /// # Errors
    ///
    /// [`Error::ChainMismatch`] if a chain's width or vector lengths do not
    /// fit the config, or if it is already finalized.
    pub fn from_chains(config: Config, chains: Vec<Chain>) -> Result<Self> {
        config.validate()?;
        if chains.is_empty() {
            return Err(Error::ZeroChains);
        }
        for (index, chain) in chains.iter().enumerate() {
            if chain.bits() != config.bits
                || chain.input_len() != config.input_len
                || chain.output_len() != config.output_len
                || chain.is_finalized()
            {
                return Err(Error::ChainMismatch {
                    index
                });
            }
        }
        Ok(Self {
            chains,
            config,
            finalized: false
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    #[inline]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn chains_mut(&mut self) -> &mut [Chain] {
        &mut self.chains
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn check_input(&self, input: &[u8]) -> Result<()> {
        check_len(self.config.input_len, input.len())
    }

    pub(crate) fn check_example(&self, input: &[u8], output: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(Error::AlreadyFinalized);
        }
        self.check_input(input)?;
        check_len(self.config.output_len, output.len())
    }

    /// # Overview
    ///
    /// Adds one example pair to every chain's statistics.
    pub fn observe(&mut self, input: &[u8], output: &[u8]) -> Result<()> {
        self.check_example(input, output)?;
        for chain in &mut self.chains {
            chain.observe(input, output)?;
        }
        Ok(())
    }

    /// # Overview
    ///
    /// Finalizes every chain. Further calls recompute identical tables.
    pub fn finalize(&mut self) {
        let abstain = self.config.abstain;
        for chain in &mut self.chains {
            chain.finalize(abstain);
        }
        self.finalized = true;

        log::debug!(
            "finalized {} chains, {:.1}% of codes abstain",
            self.chains.len(),
            self.abstain_ratio() * 100.0
        );
    }

    /// # Overview
    ///
    /// Fraction of (chain, input code) pairs that abstain.
    pub fn abstain_ratio(&self) -> f64 {
        let total: usize = self.chains.iter().map(|c| c.n_codes()).sum();
        if total == 0 {
            return 0.0;
        }
        let abstained: usize = self.chains.iter().map(|c| c.abstain_count()).sum();
        abstained as f64 / total as f64
    }

    /// # Overview
    ///
    /// Resets `tally` and lets every chain vote on `input`.
    ///
    /// Returns the number of chains that did not abstain.
    pub fn cast_votes(&self, input: &[u8], tally: &mut VoteTally) -> Result<usize> {
        if !self.finalized {
            return Err(Error::NotFinalized);
        }
        self.check_input(input)?;
        check_len(self.config.output_len, tally.len())?;

        tally.reset();
        let mut voted = 0;
        for chain in &self.chains {
            if chain.vote(input, tally)? {
                voted += 1;
            }
        }
        Ok(voted)
    }

    /// # Overview
    ///
    /// Votes on `input` and decodes the tally into `out`.
    ///
    /// `out` is also the previous output for [`VotePolicy::Hold`].
    ///
    /// [`VotePolicy::Hold`]: crate::VotePolicy::Hold
    pub fn predict_into(&self, input: &[u8], tally: &mut VoteTally, out: &mut [u8]) -> Result<()> {
        self.cast_votes(input, tally)?;
        tally.decode(self.config.output_max, self.config.empty_vote, out)
    }

    /// # Overview
    ///
    /// Allocating variant of [`Ensemble::predict_into`].
    pub fn predict(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut tally = VoteTally::new(self.config.output_len);
        let mut out = vec![0; self.config.output_len];
        self.predict_into(input, &mut tally, &mut out)?;
        Ok(out)
    }
}
