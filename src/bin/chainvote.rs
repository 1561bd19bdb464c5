//! Trains an ensemble on a preset task and prints guesses next to answers.
//!
//! Usage:
//!   cargo run --release --bin chainvote -- [--preset sort|shared-sort|sum]
//!       [--examples N] [--trials N] [--seed N]
//!
//! Set `RUST_LOG=info` to see training progress.

use std::process::ExitCode;

use chainvote::{
    Approximator, Config, Preset, TrainOptions,
    utils::{rng_from_entropy, rng_from_seed}
};
use clap::{
    Arg, Command, ValueEnum,
    builder::{EnumValueParser, PossibleValue},
    value_parser
};
use rand::Rng;

fn format_values(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| format!("{v:03}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Command-line names of the presets.
#[derive(Debug, Clone, Copy)]
struct PresetArg(Preset);

impl ValueEnum for PresetArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self(Preset::Sort),
            Self(Preset::SharedSort),
            Self(Preset::Sum)
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let name = match self.0 {
            Preset::Sort => "sort",
            Preset::SharedSort => "shared-sort",
            Preset::Sum => "sum"
        };
        Some(PossibleValue::new(name))
    }
}

fn run() -> chainvote::Result<()> {
    let matches = Command::new("chainvote")
        .version("0.1.0")
        .about("Learns a vector transformation with an ensemble of voting chains.")
        .arg(
            Arg::new("preset")
                .long("preset")
                .help("Configuration and target to learn.")
                .value_parser(EnumValueParser::<PresetArg>::new())
                .default_value("sort")
        )
        .arg(
            Arg::new("examples")
                .long("examples")
                .help("Number of training examples.")
                .value_parser(value_parser!(usize))
                .default_value("10000")
        )
        .arg(
            Arg::new("trials")
                .long("trials")
                .help("Number of inputs to predict after training.")
                .value_parser(value_parser!(usize))
                .default_value("40")
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for a reproducible run. Uses OS entropy when omitted.")
                .value_parser(value_parser!(u64))
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let preset = matches
        .get_one::<PresetArg>("preset")
        .map_or(Preset::Sort, |arg| arg.0);
    let examples = matches.get_one::<usize>("examples").copied().unwrap_or(10_000);
    let trials = matches.get_one::<usize>("trials").copied().unwrap_or(40);
    let mut rng = match matches.get_one::<u64>("seed") {
        Some(&seed) => rng_from_seed(seed),
        None => rng_from_entropy()
    };

    println!("Training...");
    let config = Config::preset(preset);
    let mut approx = Approximator::new(config, preset.task(), &mut rng)?;
    let opts = TrainOptions::new(examples, rng.random()).report_every(examples / 10);
    let report = approx.fit_with_options(opts)?;
    log::info!(
        "trained on {} examples ({} all-minimum, {} all-maximum)",
        report.examples_run,
        report.minimum,
        report.maximum
    );

    for _ in 0..trials {
        let input = approx.random_input(&mut rng)?;
        println!("Input: {}", format_values(&input));

        let guess = approx.predict(&input)?;
        println!("Guess: {}", format_values(guess));

        println!("Answer:{}", format_values(&approx.answer(&input)));
    }

    let eval = approx.evaluate(1_000, &mut rng)?;
    log::info!(
        "exact {:.1}%, ordered {:.1}%, mean abs error {:.2}",
        eval.exact * 100.0,
        eval.ordered * 100.0,
        eval.mae
    );
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
