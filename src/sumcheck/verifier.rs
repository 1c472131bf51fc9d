use alloc::{format, string::ToString, vec::Vec};

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};
use tracing::{debug, instrument};

use super::{
    errors::{SumcheckError, VerificationFailure},
    output::SumcheckOutput,
    pow::PowRandomizer,
};
use crate::{
    fiat_shamir::verifier::VerifierState,
    parameters::SumcheckConfig,
    poly::{barycentric, multilinear::MultilinearPoint, univariate::Univariate},
    relations::{ColumnValues, NUM_COLUMNS, RelationParameters, RelationSet},
};

/// Sumcheck verifier.
///
/// Replays the prover's transcript and checks every round against a running target, starting
/// from the claimed total `0`.
#[derive(Debug)]
pub struct SumcheckVerifier<EF: Field, const MAX_LENGTH: usize> {
    config: SumcheckConfig,
    relations: RelationSet<EF>,
}

impl<EF: Field, const MAX_LENGTH: usize> SumcheckVerifier<EF, MAX_LENGTH> {
    pub fn new(config: SumcheckConfig, relations: RelationSet<EF>) -> Result<Self, SumcheckError> {
        relations.validate(MAX_LENGTH)?;
        Ok(Self { config, relations })
    }

    /// Verifies a sumcheck proof.
    ///
    /// Returns `Ok(None)` if the proof is readable but some check fails, and an error if the
    /// transcript cannot be read.
    pub fn verify<F, Challenger>(
        &self,
        params: &RelationParameters<EF>,
        verifier_state: &mut VerifierState<F, EF, Challenger>,
    ) -> Result<Option<SumcheckOutput<EF>>, SumcheckError>
    where
        F: Field,
        EF: ExtensionField<F>,
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        match self.verify_with_trace(params, verifier_state) {
            Ok(output) => Ok(Some(output)),
            Err(VerificationFailure::Malformed(err)) => Err(err),
            Err(failure) => {
                debug!(%failure, "sumcheck proof rejected");
                Ok(None)
            }
        }
    }

    /// Same as [`Self::verify`], but says which check failed.
    ///
    /// Verification stops at the first failing round.
    #[instrument(skip_all, fields(num_variables = self.config.num_variables))]
    pub fn verify_with_trace<F, Challenger>(
        &self,
        params: &RelationParameters<EF>,
        verifier_state: &mut VerifierState<F, EF, Challenger>,
    ) -> Result<SumcheckOutput<EF>, VerificationFailure>
    where
        F: Field,
        EF: ExtensionField<F>,
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        let [alpha, zeta] = verifier_state.get_challenges(["Sumcheck:alpha", "Sumcheck:zeta"])?;
        let mut pow = PowRandomizer::new(zeta);
        let mut challenges = Vec::with_capacity(self.config.num_variables);
        let mut target = EF::ZERO;

        for l in 0..self.config.num_variables {
            let round_univariate = Univariate::<EF, MAX_LENGTH>::new(
                verifier_state.receive_const(&format!("Sumcheck:T_{l}"))?,
            );

            let claimed = round_univariate.value_at(0) + pow.zeta_pow() * round_univariate.value_at(1);
            if claimed != target {
                return Err(VerificationFailure::RoundSum {
                    round: l,
                    expected: target.to_string(),
                    actual: claimed.to_string(),
                });
            }

            verifier_state.check_pow_grinding(&format!("Sumcheck:pow_{l}"), self.config.pow_bits)?;
            let u = verifier_state.get_challenge(&format!("Sumcheck:u_{l}"))?;

            target = barycentric::evaluate(&round_univariate, u) * pow.univariate_eval(u);
            pow.fold(u);
            challenges.push(u);
        }

        let evaluations =
            ColumnValues::new(verifier_state.receive_const::<NUM_COLUMNS>("Sumcheck:evaluations")?);
        let full_evaluation = pow.partial_evaluation_constant()
            * self.relations.batch_evaluations(&evaluations, params, alpha);
        if full_evaluation != target {
            return Err(VerificationFailure::FinalEvaluation {
                expected: target.to_string(),
                actual: full_evaluation.to_string(),
            });
        }

        Ok(SumcheckOutput {
            evaluation_point: MultilinearPoint::new(challenges),
            evaluations,
        })
    }
}
