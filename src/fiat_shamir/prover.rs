use alloc::vec::Vec;
use core::marker::PhantomData;

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{BasedVectorSpace, ExtensionField, Field};

use super::{
    domain_separator::DomainSeparator,
    pattern::{Pattern, PatternTracker, label_to_field_elements},
    proof::SumcheckProof,
};

/// Prover state for a Fiat-Shamir protocol.
///
/// Every interaction is labeled. The label is absorbed before the payload (or before squeezing),
/// and must match the next op of the domain separator the state was built from.
#[derive(Debug)]
pub struct ProverState<F, EF, Challenger>
where
    F: Field,
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
{
    challenger: Challenger,
    proof_data: Vec<F>,
    pattern: PatternTracker,
    _extension_field: PhantomData<EF>,
}

impl<F, EF, Challenger> ProverState<F, EF, Challenger>
where
    EF: ExtensionField<F>,
    F: Field,
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
{
    /// Initialize a new prover state.
    #[must_use]
    pub fn new(domain_separator: &DomainSeparator<EF, F>, mut challenger: Challenger) -> Self {
        domain_separator.observe_domain_separator(&mut challenger);

        Self {
            challenger,
            proof_data: Vec::new(),
            pattern: PatternTracker::new(domain_separator.ops()),
            _extension_field: PhantomData,
        }
    }

    pub fn proof_data(&self) -> &[F] {
        &self.proof_data
    }

    /// Ends the protocol and returns the data the verifier needs.
    ///
    /// # Panics
    /// Panics if the domain separator declares interactions that never happened.
    pub fn into_proof(self) -> SumcheckProof<F> {
        if let Err(err) = self.pattern.finish() {
            panic!("prover stopped before the end of its domain separator: {err}");
        }
        SumcheckProof::new(self.proof_data)
    }

    fn expect(&mut self, pattern: Pattern, label: &str, len: usize) {
        if let Err(err) = self.pattern.advance(pattern, label, len) {
            panic!("prover diverged from its domain separator: {err}");
        }
        self.challenger
            .observe_slice(&label_to_field_elements::<F>(label));
    }

    // Passing data to the verifier:

    fn add_base_scalars(&mut self, scalars: &[F]) {
        self.proof_data.extend(scalars);
        self.challenger.observe_slice(scalars);
    }

    fn add_extension_scalars(&mut self, scalars: &[EF]) {
        let flattened: Vec<F> = scalars
            .iter()
            .flat_map(|e| <EF as BasedVectorSpace<F>>::as_basis_coefficients_slice(e).to_vec())
            .collect();
        self.add_base_scalars(&flattened);
    }

    /// Sends `scalars` to the verifier under `label`.
    ///
    /// # Panics
    /// Panics if the interaction does not match the domain separator.
    pub fn send(&mut self, label: &str, scalars: &[EF]) {
        self.expect(Pattern::Observe, label, scalars.len());
        self.add_extension_scalars(scalars);
    }

    // Generating pseudo-random values:

    /// Samples a challenge under `label`.
    ///
    /// # Panics
    /// Panics if the interaction does not match the domain separator.
    pub fn get_challenge(&mut self, label: &str) -> EF {
        self.expect(Pattern::Sample, label, 1);
        self.challenger.sample_algebra_element()
    }

    /// Samples one challenge per label, in order.
    pub fn get_challenges<const K: usize>(&mut self, labels: [&str; K]) -> [EF; K] {
        labels.map(|label| self.get_challenge(label))
    }

    // Pow grinding

    /// Finds a proof-of-work witness of `bits` bits and sends it. Does nothing when `bits == 0`.
    pub fn pow_grinding(&mut self, label: &str, bits: usize) {
        if bits == 0 {
            return;
        }
        self.expect(Pattern::Grind, label, bits);
        let witness = self.challenger.grind(bits);
        self.proof_data.push(witness);
    }
}
