//! Error types for the chain ensemble.

use core::fmt;

/// # Overview
///
/// Errors that can occur when configuring, training or querying an ensemble.
///
/// Configuration problems (`MissingInputLen` through `InvalidBoundaryDraw`)
/// are reported by [`Config::validate`](crate::Config::validate).
/// `EmptyRange` is the only sampling failure. `VoteUndefined` is produced
/// only under [`VotePolicy::Strict`](crate::VotePolicy::Strict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingInputLen,
    MissingOutputLen,
    InvalidBits { bits: usize },
    ZeroChains,
    TooManyChains { input_len: usize, chains_per_input: usize },
    ZeroValueMax,
    MirrorLengthMismatch { input: usize, output: usize },
    InvalidBoundaryDraw { draw: usize },
    EmptyRange,
    DimensionMismatch { expected: usize, got: usize },
    LocationOutOfRange { location: usize, len: usize },
    ChainMismatch { index: usize },
    AlreadyFinalized,
    NotFinalized,
    VoteUndefined { location: usize }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInputLen => write!(f, "input length is required"),
            Self::MissingOutputLen => write!(f, "output length is required"),
            Self::InvalidBits {
                bits
            } => write!(f, "bit width must be in 1..={}, got {bits}", crate::MAX_BITS),
            Self::ZeroChains => write!(f, "chains per input must be > 0"),
            Self::TooManyChains {
                input_len,
                chains_per_input
            } => {
                write!(f, "{input_len} inputs x {chains_per_input} chains overflows usize")
            }
            Self::ZeroValueMax => write!(f, "value maximum must be > 0"),
            Self::MirrorLengthMismatch {
                input,
                output
            } => {
                write!(
                    f,
                    "mirrored sampling needs equal lengths, got input {input} and output {output}"
                )
            }
            Self::InvalidBoundaryDraw {
                draw
            } => {
                write!(f, "boundary draw must be 0 or >= 3, got {draw}")
            }
            Self::EmptyRange => write!(f, "cannot sample from an empty range"),
            Self::DimensionMismatch {
                expected,
                got
            } => {
                write!(f, "dimension mismatch: expected {expected}, got {got}")
            }
            Self::LocationOutOfRange {
                location,
                len
            } => {
                write!(f, "location {location} out of range for length {len}")
            }
            Self::ChainMismatch {
                index
            } => {
                write!(f, "chain {index} does not match the ensemble configuration")
            }
            Self::AlreadyFinalized => write!(f, "chain is already finalized"),
            Self::NotFinalized => write!(f, "ensemble must be finalized before voting"),
            Self::VoteUndefined {
                location
            } => {
                write!(f, "no votes were cast for output location {location}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// # Overview
///
/// Result type for ensemble operations.
pub type Result<T> = core::result::Result<T, Error>;
