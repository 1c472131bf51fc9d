use alloc::{string::ToString, vec::Vec};
use core::marker::PhantomData;

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};

use super::{
    domain_separator::DomainSeparator,
    errors::FiatShamirError,
    pattern::{Pattern, PatternTracker, label_to_field_elements},
};

/// State held by the verifier in a Fiat-Shamir protocol.
///
/// This struct replays the transcript produced by the prover: it consumes proof data, absorbs
/// it in the same order and with the same labels, and derives the same challenges.
#[derive(Debug)]
pub struct VerifierState<F, EF, Challenger>
where
    F: Field,
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
{
    /// Cryptographic challenger used for sampling challenges and observing proof data.
    challenger: Challenger,

    /// Proof data buffer received from the prover, in base field elements.
    proof_data: Vec<F>,

    /// Current read index into `proof_data`.
    index: usize,

    /// Interactions still expected by the domain separator.
    pattern: PatternTracker,

    /// Marker to track the extension field type without storing it explicitly.
    _extension_field: PhantomData<EF>,
}

impl<F, EF, Challenger> VerifierState<F, EF, Challenger>
where
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    EF: ExtensionField<F>,
    F: Field,
{
    /// Create a new verifier state using the given domain separator and proof data.
    ///
    /// # Arguments
    /// - `domain_separator`: Domain separator binding the transcript to a specific protocol.
    /// - `proof_data`: All base field elements committed by the prover.
    /// - `challenger`: Initialized cryptographic challenger.
    #[must_use]
    pub fn new(
        domain_separator: &DomainSeparator<EF, F>,
        proof_data: Vec<F>,
        mut challenger: Challenger,
    ) -> Self {
        domain_separator.observe_domain_separator(&mut challenger);

        Self {
            challenger,
            proof_data,
            index: 0,
            pattern: PatternTracker::new(domain_separator.ops()),
            _extension_field: PhantomData,
        }
    }

    /// Number of proof scalars not read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.proof_data.len() - self.index
    }

    fn expect(&mut self, pattern: Pattern, label: &str, len: usize) -> Result<(), FiatShamirError> {
        self.pattern.advance(pattern, label, len)?;
        self.challenger
            .observe_slice(&label_to_field_elements::<F>(label));
        Ok(())
    }

    /// Consume and return `n` base scalars from the proof data, observing them in the challenger.
    ///
    /// # Errors
    /// Returns `FiatShamirError::ExceededTranscript` if insufficient data remains.
    fn next_base_scalars_vec(&mut self, n: usize) -> Result<Vec<F>, FiatShamirError> {
        // Check that enough data remains to read `n` elements.
        if n > self.remaining() {
            return Err(FiatShamirError::ExceededTranscript);
        }

        let scalars = self.proof_data[self.index..self.index + n].to_vec();
        self.index += n;

        // Observe these scalars in the challenger to update its state.
        self.challenger.observe_slice(&scalars);

        Ok(scalars)
    }

    /// Receives `n` extension scalars sent under `label`.
    ///
    /// # Errors
    /// - `UnexpectedLabel` or `LengthMismatch` if the interaction does not match the domain
    ///   separator.
    /// - `ExceededTranscript` if insufficient data remains.
    pub fn receive(&mut self, label: &str, n: usize) -> Result<Vec<EF>, FiatShamirError> {
        self.expect(Pattern::Observe, label, n)?;
        let bases = self.next_base_scalars_vec(n * EF::DIMENSION)?;
        Ok(EF::reconstitute_from_base(bases))
    }

    /// Receives exactly `N` extension scalars sent under `label`.
    ///
    /// # Errors
    /// Same as [`Self::receive`].
    pub fn receive_const<const N: usize>(&mut self, label: &str) -> Result<[EF; N], FiatShamirError> {
        self.receive(label, N)?
            .try_into()
            .map_err(|v: Vec<EF>| FiatShamirError::LengthMismatch {
                label: label.to_string(),
                expected: N,
                found: v.len(),
            })
    }

    /// Samples a challenge under `label`.
    ///
    /// # Errors
    /// Returns `UnexpectedLabel` if the interaction does not match the domain separator.
    pub fn get_challenge(&mut self, label: &str) -> Result<EF, FiatShamirError> {
        self.expect(Pattern::Sample, label, 1)?;
        Ok(self.challenger.sample_algebra_element())
    }

    /// Samples one challenge per label, in order.
    ///
    /// # Errors
    /// Same as [`Self::get_challenge`].
    pub fn get_challenges<const K: usize>(
        &mut self,
        labels: [&str; K],
    ) -> Result<[EF; K], FiatShamirError> {
        let mut challenges = [EF::ZERO; K];
        for (challenge, label) in challenges.iter_mut().zip(labels) {
            *challenge = self.get_challenge(label)?;
        }
        Ok(challenges)
    }

    /// Verify PoW grinding witness correctness.
    ///
    /// # Errors
    /// Returns `FiatShamirError::ExceededTranscript` if no data remains,
    /// or `FiatShamirError::InvalidGrindingWitness` if the witness does not satisfy the difficulty.
    pub fn check_pow_grinding(&mut self, label: &str, bits: usize) -> Result<(), FiatShamirError> {
        // If no grinding is required, succeed immediately.
        if bits == 0 {
            return Ok(());
        }
        self.expect(Pattern::Grind, label, bits)?;

        // Ensure there is at least one witness element to consume.
        if self.remaining() == 0 {
            return Err(FiatShamirError::ExceededTranscript);
        }

        let witness = self.proof_data[self.index];
        self.index += 1;

        if self.challenger.check_witness(bits, witness) {
            Ok(())
        } else {
            Err(FiatShamirError::InvalidGrindingWitness)
        }
    }

    /// Checks that the protocol is over and that every scalar of the proof was read.
    ///
    /// # Errors
    /// - `UnexpectedLabel` if the domain separator declares interactions that never happened.
    /// - `TrailingData` if unread proof data remains.
    pub fn finalize(self) -> Result<(), FiatShamirError> {
        self.pattern.finish()?;
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(FiatShamirError::TrailingData { remaining }),
        }
    }
}
