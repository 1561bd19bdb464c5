//! Property-based tests for the chain ensemble.

use chainvote::{
    Chain, Config, Task, Target, Transition, VotePolicy, VoteTally,
    encoder::{code_space, encode},
    sampler::sample,
    utils::rng_from_seed
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Codes always fit the bit width.
    #[test]
    fn encode_within_code_space(
        values in prop::collection::vec(any::<u8>(), 1..16),
        tests in prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 1..=8)
    ) {
        let locations: Vec<usize> = tests.iter().map(|(i, _)| i.index(values.len())).collect();
        let thresholds: Vec<u8> = tests.iter().map(|&(_, t)| t).collect();

        let code = encode(&values, &locations, &thresholds);
        prop_assert!((code as usize) < code_space(locations.len()));
    }

    /// Sampled values stay in range.
    #[test]
    fn sample_in_range(n in 1usize..1000, seed in any::<u64>()) {
        let mut rng = rng_from_seed(seed);
        for _ in 0..20 {
            prop_assert!(sample(&mut rng, n).unwrap() < n);
        }
    }

    /// Finalization picks the lowest code with the highest count and abstains
    /// exactly on empty rows.
    #[test]
    fn finalize_picks_smallest_argmax(
        records in prop::collection::vec((0u8..4, 0u8..4), 0..40)
    ) {
        let mut chain = Chain::from_parts(
            vec![0, 0], vec![10, 20], vec![0, 0], vec![10, 20], 1, 1
        ).unwrap();
        for &(i, o) in &records {
            chain.record(i, o).unwrap();
        }
        chain.finalize(true);

        for in_code in 0..4u8 {
            let row = chain.stats_row(in_code);
            let max = *row.iter().max().unwrap();
            let expected = if max == 0 {
                Transition::Abstain
            } else {
                Transition::Predicted(row.iter().position(|&c| c == max).unwrap() as u8)
            };
            prop_assert_eq!(chain.transitions()[in_code as usize], expected);
        }
    }

    /// Finalization is idempotent.
    #[test]
    fn finalize_idempotent(
        records in prop::collection::vec((0u8..4, 0u8..4), 0..40),
        abstain in any::<bool>()
    ) {
        let mut chain = Chain::from_parts(
            vec![0, 0], vec![10, 20], vec![0, 0], vec![10, 20], 1, 1
        ).unwrap();
        for &(i, o) in &records {
            chain.record(i, o).unwrap();
        }
        chain.finalize(abstain);
        let first = chain.transitions().to_vec();
        chain.finalize(abstain);
        prop_assert_eq!(chain.transitions(), first.as_slice());
    }

    /// Vote ratios lie in [0, 1] and decoded values in [0, max].
    #[test]
    fn vote_ratios_bounded(
        votes in prop::collection::vec((0usize..4, any::<bool>()), 0..200),
        max in 1u8..=255
    ) {
        let mut tally = VoteTally::new(4);
        for &(loc, bit) in &votes {
            tally.cast(loc, bit);
        }

        let mut out = [0u8; 4];
        tally.decode(max, VotePolicy::Zero, &mut out).unwrap();

        for loc in 0..4 {
            if let Some(r) = tally.ratio(loc) {
                prop_assert!((0.0..=1.0).contains(&r));
            } else {
                prop_assert_eq!(out[loc], 0);
            }
            prop_assert!(out[loc] <= max);
        }
    }

    /// Sampled chains only use valid locations and thresholds.
    #[test]
    fn sampled_chain_in_bounds(
        input_len in 1usize..6,
        output_len in 1usize..6,
        bits in 1usize..=8,
        input_max in 1u8..=255,
        seed in any::<u64>()
    ) {
        let config = Config::builder()
            .input_len(input_len)
            .output_len(output_len)
            .bits(bits)
            .input_max(input_max)
            .build()
            .unwrap();
        let chain = Chain::new(&config, 0, &mut rng_from_seed(seed)).unwrap();

        prop_assert_eq!(chain.bits(), bits);
        prop_assert!(chain.max_input_location() < input_len);
        prop_assert!(chain.max_output_location() < output_len);
        prop_assert!(chain.input_thresholds().iter().all(|&t| t < input_max));
    }

    /// Sorting target output is sorted and a permutation of the prefix.
    #[test]
    fn sort_target_sorted(input in prop::collection::vec(any::<u8>(), 1..8)) {
        let mut out = vec![0u8; input.len()];
        Task::Sort.apply(&input, &mut out);

        let mut expected = input.clone();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    /// Config validation works correctly.
    #[test]
    fn config_validation(
        input_len in 0usize..4,
        output_len in 0usize..4,
        bits in 0usize..12,
        chains in 0usize..4
    ) {
        let result = Config::builder()
            .input_len(input_len)
            .output_len(output_len)
            .bits(bits)
            .chains_per_input(chains)
            .build();

        let valid = input_len > 0 && output_len > 0 && (1..=8).contains(&bits) && chains > 0;
        prop_assert_eq!(result.is_ok(), valid);
    }
}
