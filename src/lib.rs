//! # chainvote
//!
//! An ensemble of weak bit-code predictors ("chains") that learns a
//! transformation of small byte vectors, such as sorting, from randomly
//! generated examples.
//!
//! Each chain samples a few (location, threshold) tests on the input and the
//! output, counts which output code follows which input code, and keeps the
//! most frequent one. At inference every chain votes its predicted output
//! bits and the vote fractions are decoded back into bytes.
//!
//! # Features
//!
//! - `cli` (default): the `chainvote` binary
//! - `parallel`: parallel training and voting via rayon
//!
//! # Examples
//!
//! ```
//! use chainvote::{Approximator, Config, Task};
//!
//! let config = Config::builder()
//!     .input_len(2)
//!     .output_len(2)
//!     .chains_per_input(16)
//!     .build()
//!     .unwrap();
//!
//! let mut approx = Approximator::with_seed(config, Task::Sort, 42).unwrap();
//! approx.fit(2_000, 7).unwrap();
//!
//! let guess = approx.predict(&[180, 20]).unwrap();
//! assert_eq!(guess.len(), 2);
//! ```

mod approximator;
mod chain;
mod config;
pub mod encoder;
mod ensemble;
pub mod error;
mod example;
pub mod sampler;
pub mod training;
pub mod utils;
mod vote;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use approximator::{Approximator, Evaluation};
pub use chain::{Chain, Transition};
pub use config::{Config, ConfigBuilder, OutputSampling, Preset, ThresholdMode};
pub use encoder::{Code, MAX_BITS};
pub use ensemble::Ensemble;
pub use error::{Error, Result};
pub use example::{ExampleGenerator, ExampleKind, Target, Task};
pub use training::{TrainOptions, TrainReport};
pub use vote::{VotePolicy, VoteTally};
