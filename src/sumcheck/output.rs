use p3_field::Field;
use serde::{Deserialize, Serialize};

use crate::{
    poly::multilinear::MultilinearPoint,
    relations::{Column, ColumnValues},
};

/// What a successful sumcheck reduces to: the claim that every column's multilinear extension
/// takes the value in `evaluations` at `evaluation_point`.
///
/// These claims are left to a polynomial commitment opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumcheckOutput<F> {
    /// The round challenges `u_0, …, u_{d-1}`, where `u_l` is bound to `X_l`.
    pub evaluation_point: MultilinearPoint<F>,
    /// The claimed value of every column at `evaluation_point`.
    pub evaluations: ColumnValues<F>,
}

impl<F: Field> SumcheckOutput<F> {
    #[must_use]
    pub fn evaluation(&self, column: Column) -> F {
        self.evaluations[column]
    }
}
