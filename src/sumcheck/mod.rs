//! The sumcheck over the relations of a Honk instance.
//!
//! For `d` variables the prover convinces the verifier that
//!
//! ```text
//! Σ_{b ∈ {0,1}^d} pow_ζ(b) · Σ_i α^i · C_i(columns(b)) = 0
//! ```
//!
//! in `d` rounds, binding `X_0` first. The protocol ends with a claimed value for every column
//! at the random point `(u_0, …, u_{d-1})`, see [`SumcheckOutput`].

use crate::relations::SortRelation;

pub mod errors;
pub mod output;
pub mod pow;
pub mod prover;
pub mod round;
pub mod verifier;

pub use errors::{SumcheckError, VerificationFailure};
pub use output::SumcheckOutput;
pub use pow::PowRandomizer;
pub use prover::SumcheckProver;
pub use round::SumcheckRound;
pub use verifier::SumcheckVerifier;

/// Round polynomial length needed by [`RelationSet::standard`](crate::relations::RelationSet::standard).
pub const HONK_MAX_LENGTH: usize = SortRelation::LENGTH;
