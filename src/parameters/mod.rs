use core::fmt::{self, Display};

use p3_field::{ExtensionField, Field};
use serde::{Deserialize, Serialize};

use crate::fiat_shamir::domain_separator::DomainSeparator;

/// Number of edges a single parallel task accumulates in a round.
///
/// Below this many edges a round runs on the calling thread.
pub const DEFAULT_EDGES_PER_TASK: usize = 1 << 10;

/// Shape of a sumcheck run, shared by the prover and the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumcheckConfig {
    /// `d = log2(circuit size)`, the number of rounds.
    pub num_variables: usize,
    /// Proof-of-work bits ground before each round challenge. Zero disables grinding.
    pub pow_bits: usize,
    /// See [`DEFAULT_EDGES_PER_TASK`].
    pub edges_per_task: usize,
}

impl SumcheckConfig {
    #[must_use]
    pub const fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            pow_bits: 0,
            edges_per_task: DEFAULT_EDGES_PER_TASK,
        }
    }

    #[must_use]
    pub const fn with_pow_bits(mut self, pow_bits: usize) -> Self {
        self.pow_bits = pow_bits;
        self
    }

    #[must_use]
    pub const fn with_edges_per_task(mut self, edges_per_task: usize) -> Self {
        self.edges_per_task = edges_per_task;
        self
    }

    /// Number of rows of every column.
    #[must_use]
    pub const fn circuit_size(&self) -> usize {
        1 << self.num_variables
    }

    /// The transcript pattern of this sumcheck, with round polynomials of `max_length`
    /// evaluations.
    #[must_use]
    pub fn domain_separator<EF, F>(&self, protocol: &str, max_length: usize) -> DomainSeparator<EF, F>
    where
        EF: ExtensionField<F>,
        F: Field,
    {
        let mut domsep = DomainSeparator::new(protocol);
        domsep.add_sumcheck(self.num_variables, max_length, self.pow_bits);
        domsep
    }
}

impl Display for SumcheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of variables: {}", self.num_variables)?;
        writeln!(f, "Circuit size: {}", self.circuit_size())?;
        write!(f, "PoW bits per round: {}", self.pow_bits)
    }
}
