use alloc::{format, vec::Vec};

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};
use tracing::{info_span, instrument};

use super::{errors::SumcheckError, output::SumcheckOutput, pow::PowRandomizer, round::SumcheckRound};
use crate::{
    fiat_shamir::prover::ProverState,
    parameters::SumcheckConfig,
    poly::{evals::EvaluationsList, multilinear::MultilinearPoint},
    relations::{AllEntities, RelationParameters, RelationSet},
};

/// Sumcheck prover over the columns of one instance.
///
/// The columns are folded in place, one variable per round, so a prover runs once.
#[derive(Debug)]
pub struct SumcheckProver<EF: Field, const MAX_LENGTH: usize> {
    config: SumcheckConfig,
    relations: RelationSet<EF>,
    columns: AllEntities<EvaluationsList<EF>>,
    round: SumcheckRound<EF, MAX_LENGTH>,
}

impl<EF: Field, const MAX_LENGTH: usize> SumcheckProver<EF, MAX_LENGTH> {
    /// Checks that every column has `2^num_variables` rows and that every relation fits in
    /// `MAX_LENGTH` evaluations.
    pub fn new(
        config: SumcheckConfig,
        relations: RelationSet<EF>,
        columns: AllEntities<EvaluationsList<EF>>,
    ) -> Result<Self, SumcheckError> {
        relations.validate(MAX_LENGTH)?;

        let expected = config.circuit_size();
        for (column, evals) in columns.iter() {
            let len = evals.num_evals();
            if !len.is_power_of_two() {
                return Err(SumcheckError::NotPowerOfTwo {
                    column: column.name(),
                    len,
                });
            }
            if len != expected {
                return Err(SumcheckError::ColumnLengthMismatch {
                    column: column.name(),
                    len,
                    expected,
                });
            }
        }

        let round = SumcheckRound::new(expected, &relations, config.edges_per_task);
        Ok(Self {
            config,
            relations,
            columns,
            round,
        })
    }

    /// Runs every round against `prover_state` and returns the evaluation claims.
    ///
    /// # Panics
    /// Panics if `prover_state` was not built from a domain separator declaring this sumcheck.
    #[instrument(skip_all, fields(num_variables = self.config.num_variables))]
    pub fn prove<F, Challenger>(
        mut self,
        params: &RelationParameters<EF>,
        prover_state: &mut ProverState<F, EF, Challenger>,
    ) -> SumcheckOutput<EF>
    where
        F: Field,
        EF: ExtensionField<F>,
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        let [alpha, zeta] = prover_state.get_challenges(["Sumcheck:alpha", "Sumcheck:zeta"]);
        let mut pow = PowRandomizer::new(zeta);
        let mut challenges = Vec::with_capacity(self.config.num_variables);

        for l in 0..self.config.num_variables {
            let _span = info_span!("sumcheck round", round = l).entered();

            let round_univariate =
                self.round
                    .compute_univariate(&self.columns, &self.relations, params, &pow, alpha);
            prover_state.send(&format!("Sumcheck:T_{l}"), round_univariate.as_slice());
            prover_state.pow_grinding(&format!("Sumcheck:pow_{l}"), self.config.pow_bits);
            let u = prover_state.get_challenge(&format!("Sumcheck:u_{l}"));

            self.fold(u);
            pow.fold(u);
            challenges.push(u);
        }

        let evaluations = self.columns.map(|_, column| column[0]);
        prover_state.send("Sumcheck:evaluations", evaluations.as_slice());

        SumcheckOutput {
            evaluation_point: MultilinearPoint::new(challenges),
            evaluations,
        }
    }

    /// Binds the lowest remaining variable of every column to `challenge`.
    fn fold(&mut self, challenge: EF) {
        for column in self.columns.values_mut() {
            column.fold_pairs(challenge);
        }
        self.round.next_round();
    }
}
