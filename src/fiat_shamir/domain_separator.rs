use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::marker::PhantomData;

use p3_challenger::{CanObserve, FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};

use super::{
    pattern::{Op, Pattern, label_to_field_elements},
    prover::ProverState,
    verifier::VerifierState,
};
use crate::relations::NUM_COLUMNS;

/// The interaction pattern of a protocol.
///
/// Both parties absorb the whole pattern before the first interaction, which binds the
/// challenges to the protocol shape. The transcript states then check every interaction
/// against the next declared op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSeparator<EF, F> {
    protocol: String,
    ops: Vec<Op>,
    _fields: PhantomData<(EF, F)>,
}

impl<EF, F> DomainSeparator<EF, F>
where
    EF: ExtensionField<F>,
    F: Field,
{
    /// Creates an empty pattern for the protocol named `protocol`.
    #[must_use]
    pub fn new(protocol: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            ops: Vec::new(),
            _fields: PhantomData,
        }
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Declares that `count` extension scalars are sent under `label`.
    pub fn observe(&mut self, count: usize, label: impl Into<String>) {
        assert!(count > 0, "Count must be positive.");
        self.ops.push(Op::new(Pattern::Observe, label, count));
    }

    /// Declares a challenge sampled under `label`.
    pub fn sample(&mut self, label: impl Into<String>) {
        self.ops.push(Op::new(Pattern::Sample, label, 1));
    }

    /// Declares a proof-of-work of `bits` bits. Does nothing when `bits == 0`.
    pub fn pow(&mut self, bits: usize, label: impl Into<String>) {
        if bits > 0 {
            self.ops.push(Op::new(Pattern::Grind, label, bits));
        }
    }

    /// Declares the interactions of a sumcheck over `num_rounds` variables whose round
    /// polynomials have `round_length` evaluations.
    ///
    /// ```text
    /// S alpha, S zeta, then per round l: A T_l, [pow_l], S u_l, and finally A evaluations
    /// ```
    pub fn add_sumcheck(&mut self, num_rounds: usize, round_length: usize, pow_bits: usize) {
        self.sample("Sumcheck:alpha");
        self.sample("Sumcheck:zeta");
        for l in 0..num_rounds {
            self.observe(round_length, format!("Sumcheck:T_{l}"));
            self.pow(pow_bits, format!("Sumcheck:pow_{l}"));
            self.sample(format!("Sumcheck:u_{l}"));
        }
        self.observe(NUM_COLUMNS, "Sumcheck:evaluations");
    }

    /// Encodes the protocol name and every op as base field elements.
    #[must_use]
    pub fn as_field_elements(&self) -> Vec<F> {
        let mut elements = label_to_field_elements(&self.protocol);
        for op in &self.ops {
            elements.push(op.pattern.as_field_element());
            elements.push(F::from_u64(op.len as u64));
            elements.extend(label_to_field_elements::<F>(&op.label));
        }
        elements
    }

    pub fn observe_domain_separator<C: CanObserve<F>>(&self, challenger: &mut C) {
        challenger.observe_slice(&self.as_field_elements());
    }

    pub fn to_prover_state<Challenger>(&self, challenger: Challenger) -> ProverState<F, EF, Challenger>
    where
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        ProverState::new(self, challenger)
    }

    pub fn to_verifier_state<Challenger>(
        &self,
        proof_data: Vec<F>,
        challenger: Challenger,
    ) -> VerifierState<F, EF, Challenger>
    where
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        VerifierState::new(self, proof_data, challenger)
    }
}
