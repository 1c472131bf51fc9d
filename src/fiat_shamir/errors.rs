//! Fiat-Shamir transcript errors.

use alloc::string::String;

use thiserror::Error;

/// Granular error types for Fiat-Shamir operations.
///
/// Each variant describes a transcript that is malformed, as opposed to a well-formed transcript
/// carrying a false claim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FiatShamirError {
    /// The proof data ended before the protocol did.
    #[error("Exceeded transcript: not enough proof data left")]
    ExceededTranscript,
    /// An interaction happened out of the order fixed by the domain separator.
    #[error("Unexpected transcript interaction: expected {expected}, found {found}")]
    UnexpectedLabel { expected: String, found: String },
    /// An interaction carried a different number of scalars than the domain separator declares.
    #[error("Length mismatch for {label}: expected {expected} scalars, found {found}")]
    LengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    /// Proof data was left after the protocol ended.
    #[error("Trailing data: {remaining} unread scalars after the end of the protocol")]
    TrailingData { remaining: usize },
    /// Proof-of-work witness fails difficulty requirement.
    #[error("Invalid grinding witness: proof-of-work verification failed")]
    InvalidGrindingWitness,
}
