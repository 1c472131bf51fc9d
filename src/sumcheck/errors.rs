use alloc::string::String;

use thiserror::Error;

use crate::fiat_shamir::errors::FiatShamirError;

/// Errors raised when a sumcheck is set up with malformed inputs, or when the proof cannot
/// even be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SumcheckError {
    #[error(transparent)]
    Transcript(#[from] FiatShamirError),

    #[error("Column {column} has {len} rows, which is not a power of two")]
    NotPowerOfTwo { column: &'static str, len: usize },

    #[error("Column {column} has {len} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("Relation {relation} needs {length} evaluations per edge, but rounds only carry {max}")]
    RelationTooLong {
        relation: &'static str,
        length: usize,
        max: usize,
    },

    #[error("The relation set is empty")]
    EmptyRelationSet,
}

/// Why a verifier rejected a well-formed proof.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// `T(0) + ζ^{2^l} · T(1)` does not match the running target.
    #[error("Sumcheck verification failed at round {round}: expected {expected}, got {actual}")]
    RoundSum {
        round: usize,
        expected: String,
        actual: String,
    },

    /// The claimed evaluations do not satisfy the batched relation.
    #[error("Final relation check failed: expected {expected}, got {actual}")]
    FinalEvaluation { expected: String, actual: String },

    #[error(transparent)]
    Malformed(#[from] SumcheckError),
}

impl From<FiatShamirError> for VerificationFailure {
    fn from(err: FiatShamirError) -> Self {
        Self::Malformed(err.into())
    }
}

impl VerificationFailure {
    /// Whether the proof was readable but wrong, as opposed to malformed.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::RoundSum { .. } | Self::FinalEvaluation { .. })
    }
}
