use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Everything the prover sends, flattened to base field scalars in transcript order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumcheckProof<F> {
    pub proof_data: Vec<F>,
}

impl<F> SumcheckProof<F> {
    #[must_use]
    pub const fn new(proof_data: Vec<F>) -> Self {
        Self { proof_data }
    }

    /// Number of base field scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.proof_data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proof_data.is_empty()
    }
}
