pub mod domain_separator;
pub mod errors;
pub mod pattern;
pub mod proof;
pub mod prover;
#[cfg(test)]
mod tests;
pub mod verifier;

pub use domain_separator::DomainSeparator;
pub use errors::FiatShamirError;
pub use proof::SumcheckProof;
pub use prover::ProverState;
pub use verifier::VerifierState;
