//! Design-time proofs for the PolyMur hash.
//!
//! PolyMur evaluates a polynomial over the Mersenne-61 field with a different
//! code path per input-length class. This crate does not hash anything. It
//! proves, once and exhaustively, two properties of that design:
//!
//! - every intermediate sum, product and fold stays inside its 64-bit or
//!   128-bit word for the worst input of each length class ([`engine`]);
//! - the overlapping byte windows each class reads cover every byte of the
//!   input, for every length in the modeled ranges ([`coverage`]).
//!
//! Both proofs fail closed: the first violated invariant is returned as a
//! [`ProofError`] and nothing after it runs.

use num_bigint::BigUint;
use thiserror::Error;

pub mod bounds;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod length_class;
pub mod maxima;
pub mod params;
pub mod report;

#[cfg(kani)]
mod kani_harnesses;

pub use bounds::{
    checked_add128, checked_add64, checked_fold64, checked_mul128, fold, max_fold_bound, Bound,
    Ceiling,
};
pub use config::ProofConfig;
pub use coverage::{coverage, layout, window_indices, Window, WindowScheme};
pub use engine::{prove_bounds, BoundsProof};
pub use length_class::LengthClass;
pub use maxima::{NamedBound, SymbolicMaxima, Trace};
pub use report::{run_all, ProofReport};

/// Errors that abort a proof run.
#[derive(Debug, Error)]
pub enum ProofError {
    #[error(
        "Magnitude exceeded: {value} does not fit its ceiling \
         (log2(value) = {value_log2:.4}, log2(ceiling) = {ceiling_log2:.4})"
    )]
    MagnitudeExceeded {
        value: BigUint,
        value_log2: f64,
        ceiling_log2: f64,
    },

    #[error("Unrecognized window scheme: {0:?}")]
    UnrecognizedScheme(String),

    #[error(
        "Coverage gap at length {length}: missing {missing:?}, out of range {out_of_range:?}"
    )]
    CoverageGap {
        length: usize,
        missing: Vec<usize>,
        out_of_range: Vec<usize>,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ProofError>;
