//! Parallel training and voting using rayon.
//!
//! Each chain only touches its own statistics, so training splits over
//! chains without synchronization. Voting folds per-thread tallies and
//! merges them, giving the same result as the sequential path.

use rayon::prelude::*;

use crate::{
    Ensemble,
    error::{Error, Result},
    vote::VoteTally
};

/// # Overview
///
/// Parallel [`Ensemble::observe`].
pub fn observe(ensemble: &mut Ensemble, input: &[u8], output: &[u8]) -> Result<()> {
    ensemble.check_example(input, output)?;
    ensemble
        .chains_mut()
        .par_iter_mut()
        .try_for_each(|chain| chain.observe(input, output))
}

/// # Overview
///
/// Parallel [`Ensemble::cast_votes`]: map-then-reduce over chains.
pub fn cast_votes(ensemble: &Ensemble, input: &[u8]) -> Result<VoteTally> {
    if !ensemble.is_finalized() {
        return Err(Error::NotFinalized);
    }
    ensemble.check_input(input)?;

    let len = ensemble.config().output_len;
    let tally = ensemble
        .chains()
        .par_iter()
        .try_fold(
            || VoteTally::new(len),
            |mut tally, chain| -> Result<VoteTally> {
                chain.vote(input, &mut tally)?;
                Ok(tally)
            }
        )
        .try_reduce(
            || VoteTally::new(len),
            |mut a, b| {
                a.merge(&b);
                Ok(a)
            }
        )?;
    Ok(tally)
}

/// # Overview
///
/// Parallel [`Ensemble::predict`].
pub fn predict(ensemble: &Ensemble, input: &[u8]) -> Result<Vec<u8>> {
    let tally = cast_votes(ensemble, input)?;
    let config = ensemble.config();
    let mut out = vec![0; config.output_len];
    tally.decode(config.output_max, config.empty_vote, &mut out)?;
    Ok(out)
}

/// # Overview
///
/// Sequential prediction for many inputs, parallel over inputs.
pub fn predict_batch(ensemble: &Ensemble, inputs: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    inputs.par_iter().map(|x| ensemble.predict(x)).collect()
}
