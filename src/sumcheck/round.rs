use alloc::{sync::Arc, vec, vec::Vec};
use core::ops::Range;

use p3_field::Field;
use p3_maybe_rayon::prelude::*;
use tracing::instrument;

use super::pow::PowRandomizer;
use crate::{
    poly::{barycentric::BarycentricData, evals::EvaluationsList, univariate::Univariate},
    relations::{AllEntities, RelationParameters, RelationSet},
};

type Accumulators<F, const MAX_LENGTH: usize> = Vec<Univariate<F, MAX_LENGTH>>;

/// Computes the round polynomial of one sumcheck round.
///
/// Every edge `(2i, 2i + 1)` of the current columns is extended to `MAX_LENGTH` points, each
/// relation accumulates its contribution at its own length, and the per-relation results are
/// extended to `MAX_LENGTH` and batched with powers of `α`.
///
/// The returned `T_l` leaves out the factor `(1 - X) + X · ζ^{2^l}` of the current variable:
/// the round sum is `T_l(0) + ζ^{2^l} · T_l(1)`.
#[derive(Debug, Clone)]
pub struct SumcheckRound<F, const MAX_LENGTH: usize> {
    /// Number of rows of every column in this round.
    round_size: usize,
    /// Edges handled by one parallel task. Rounds with fewer edges run on the calling thread.
    edges_per_task: usize,
    /// Extends a degree-1 edge to `MAX_LENGTH` evaluations.
    edge_extension: Arc<BarycentricData<F>>,
    /// Extends the accumulator of relation `i` from its length to `MAX_LENGTH`.
    accumulator_extensions: Vec<Arc<BarycentricData<F>>>,
}

impl<F: Field, const MAX_LENGTH: usize> SumcheckRound<F, MAX_LENGTH> {
    /// # Panics
    /// Panics if `MAX_LENGTH < 2` or if a relation is longer than `MAX_LENGTH`.
    #[must_use]
    pub fn new(round_size: usize, relations: &RelationSet<F>, edges_per_task: usize) -> Self {
        assert!(MAX_LENGTH >= 2, "round polynomials need at least two evaluations");
        assert!(relations.max_length() <= MAX_LENGTH);

        Self {
            round_size,
            edges_per_task: edges_per_task.max(1),
            edge_extension: BarycentricData::cached(2, MAX_LENGTH),
            accumulator_extensions: relations
                .iter()
                .map(|relation| BarycentricData::cached(relation.length(), MAX_LENGTH))
                .collect(),
        }
    }

    #[must_use]
    pub const fn round_size(&self) -> usize {
        self.round_size
    }

    /// Moves to the next round, after the columns were folded.
    pub const fn next_round(&mut self) {
        self.round_size /= 2;
    }

    /// Computes `T_l` over the current columns.
    #[instrument(skip_all, fields(round_size = self.round_size))]
    pub fn compute_univariate(
        &self,
        columns: &AllEntities<EvaluationsList<F>>,
        relations: &RelationSet<F>,
        params: &RelationParameters<F>,
        pow: &PowRandomizer<F>,
        alpha: F,
    ) -> Univariate<F, MAX_LENGTH> {
        debug_assert!(columns.values().all(|c| c.num_evals() == self.round_size));
        let num_edges = self.round_size / 2;

        let accumulators = if num_edges <= self.edges_per_task {
            self.accumulate_edges(columns, relations, params, pow, 0..num_edges)
        } else {
            let num_tasks = num_edges.div_ceil(self.edges_per_task);
            (0..num_tasks)
                .into_par_iter()
                .map(|task| {
                    let start = task * self.edges_per_task;
                    let end = (start + self.edges_per_task).min(num_edges);
                    self.accumulate_edges(columns, relations, params, pow, start..end)
                })
                .par_fold_reduce(
                    || self.zero_accumulators(),
                    Self::add_accumulators,
                    Self::add_accumulators,
                )
        };

        self.batch_over_relations(&accumulators, alpha)
    }

    fn zero_accumulators(&self) -> Accumulators<F, MAX_LENGTH> {
        vec![Univariate::zero(); self.accumulator_extensions.len()]
    }

    fn add_accumulators(
        mut lhs: Accumulators<F, MAX_LENGTH>,
        rhs: Accumulators<F, MAX_LENGTH>,
    ) -> Accumulators<F, MAX_LENGTH> {
        for (l, r) in lhs.iter_mut().zip(rhs) {
            *l += r;
        }
        lhs
    }

    /// Accumulates every relation over the edges in `edges`.
    ///
    /// Only the first `relation.length()` entries of each accumulator are written.
    fn accumulate_edges(
        &self,
        columns: &AllEntities<EvaluationsList<F>>,
        relations: &RelationSet<F>,
        params: &RelationParameters<F>,
        pow: &PowRandomizer<F>,
        edges: Range<usize>,
    ) -> Accumulators<F, MAX_LENGTH> {
        let mut accumulators = self.zero_accumulators();
        let mut extended = AllEntities::<Univariate<F, MAX_LENGTH>>::default();
        let mut scaling = pow.edge_scaling(edges.start);

        for edge in edges {
            self.extend_edges(&mut extended, columns, 2 * edge);

            for (relation, acc) in relations.iter().zip(accumulators.iter_mut()) {
                let len = relation.length();
                let views = extended.map(|_, u| u.view_prefix(len));
                if relation.skip(&views) {
                    continue;
                }
                relation.accumulate(&mut acc.evaluations[..len], &views, params, scaling);
            }

            scaling *= pow.zeta_pow_sqr();
        }

        accumulators
    }

    fn extend_edges(
        &self,
        extended: &mut AllEntities<Univariate<F, MAX_LENGTH>>,
        columns: &AllEntities<EvaluationsList<F>>,
        i: usize,
    ) {
        for (target, column) in extended.values_mut().zip(columns.values()) {
            let (lo, hi) = column.edge(i);
            self.edge_extension
                .extend(&[lo, hi], &mut target.evaluations);
        }
    }

    /// Horner over the relations, last one first, so relation `i` ends up scaled by `α^i`.
    fn batch_over_relations(
        &self,
        accumulators: &[Univariate<F, MAX_LENGTH>],
        alpha: F,
    ) -> Univariate<F, MAX_LENGTH> {
        accumulators
            .iter()
            .zip(&self.accumulator_extensions)
            .rev()
            .fold(Univariate::zero(), |result, (acc, extension)| {
                let mut extended = Univariate::zero();
                extension.extend(
                    &acc.evaluations[..extension.domain_size()],
                    &mut extended.evaluations,
                );
                result * alpha + extended
            })
    }
}
