//! The named columns of a Honk instance and a fixed-order container indexed by them.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use p3_field::Field;
use serde::{Deserialize, Serialize};

use crate::poly::{evals::EvaluationsList, univariate::UnivariateView};

/// Number of columns of the instance.
pub const NUM_COLUMNS: usize = 20;

/// Every column consumed by the sumcheck, in wire order.
///
/// The discriminant of each variant is its position in [`Column::ALL`], which is also the
/// order in which the final evaluations are sent to the transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// Multiplication selector.
    QM,
    /// Left wire selector.
    QL,
    /// Right wire selector.
    QR,
    /// Output wire selector.
    QO,
    /// Constant selector.
    QC,
    /// Sorted range-check selector.
    QSort,
    /// Copy-constraint permutation of the left wire.
    Sigma1,
    /// Copy-constraint permutation of the right wire.
    Sigma2,
    /// Copy-constraint permutation of the output wire.
    Sigma3,
    /// Identity permutation of the left wire.
    Id1,
    /// Identity permutation of the right wire.
    Id2,
    /// Identity permutation of the output wire.
    Id3,
    /// Indicator of the first row.
    LagrangeFirst,
    /// Indicator of the last row.
    LagrangeLast,
    /// Left wire.
    WL,
    /// Right wire.
    WR,
    /// Output wire.
    WO,
    /// Permutation grand product.
    ZPerm,
    /// Left wire shifted by one row.
    WLShift,
    /// Grand product shifted by one row.
    ZPermShift,
}

impl Column {
    pub const ALL: [Self; NUM_COLUMNS] = [
        Self::QM,
        Self::QL,
        Self::QR,
        Self::QO,
        Self::QC,
        Self::QSort,
        Self::Sigma1,
        Self::Sigma2,
        Self::Sigma3,
        Self::Id1,
        Self::Id2,
        Self::Id3,
        Self::LagrangeFirst,
        Self::LagrangeLast,
        Self::WL,
        Self::WR,
        Self::WO,
        Self::ZPerm,
        Self::WLShift,
        Self::ZPermShift,
    ];

    /// Columns produced by the prover's witness (as opposed to the circuit description).
    pub const WITNESS: [Self; 6] = [
        Self::WL,
        Self::WR,
        Self::WO,
        Self::ZPerm,
        Self::WLShift,
        Self::ZPermShift,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QM => "q_m",
            Self::QL => "q_l",
            Self::QR => "q_r",
            Self::QO => "q_o",
            Self::QC => "q_c",
            Self::QSort => "q_sort",
            Self::Sigma1 => "sigma_1",
            Self::Sigma2 => "sigma_2",
            Self::Sigma3 => "sigma_3",
            Self::Id1 => "id_1",
            Self::Id2 => "id_2",
            Self::Id3 => "id_3",
            Self::LagrangeFirst => "lagrange_first",
            Self::LagrangeLast => "lagrange_last",
            Self::WL => "w_l",
            Self::WR => "w_r",
            Self::WO => "w_o",
            Self::ZPerm => "z_perm",
            Self::WLShift => "w_l_shift",
            Self::ZPermShift => "z_perm_shift",
        }
    }
}

/// One value of type `T` per [`Column`].
///
/// Depending on `T` this is a full instance (`AllEntities<EvaluationsList<F>>`), the extended
/// edges of one round (`AllEntities<Univariate<F, N>>`), or the evaluations at a point
/// (`AllEntities<F>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllEntities<T> {
    values: [T; NUM_COLUMNS],
}

impl<T> AllEntities<T> {
    /// Wraps values given in wire order.
    pub const fn new(values: [T; NUM_COLUMNS]) -> Self {
        Self { values }
    }

    /// Builds the container by calling `f` once per column, in wire order.
    pub fn from_fn(mut f: impl FnMut(Column) -> T) -> Self {
        Self::new(core::array::from_fn(|i| f(Column::ALL[i])))
    }

    /// Wraps values given in wire order.
    ///
    /// Returns `None` if `values` does not have exactly [`NUM_COLUMNS`] entries.
    #[must_use]
    pub fn from_vec(values: Vec<T>) -> Option<Self> {
        values.try_into().ok().map(Self::new)
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &T)> {
        Column::ALL.into_iter().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Column, &mut T)> {
        Column::ALL.into_iter().zip(self.values.iter_mut())
    }

    pub fn values(&self) -> core::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.values.into()
    }

    /// Consumes the container, applying `f` to every column.
    pub fn into_map<U>(self, mut f: impl FnMut(Column, T) -> U) -> AllEntities<U> {
        let mut columns = Column::ALL.into_iter();
        AllEntities::new(self.values.map(|v| {
            let column = columns.next().unwrap_or_else(|| unreachable!());
            f(column, v)
        }))
    }

    /// Applies `f` to every column.
    pub fn map<'a, U>(&'a self, mut f: impl FnMut(Column, &'a T) -> U) -> AllEntities<U> {
        AllEntities::new(core::array::from_fn(|i| f(Column::ALL[i], &self.values[i])))
    }
}

impl<T: Default> Default for AllEntities<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Column> for AllEntities<T> {
    type Output = T;

    fn index(&self, column: Column) -> &T {
        &self.values[column.index()]
    }
}

impl<T> IndexMut<Column> for AllEntities<T> {
    fn index_mut(&mut self, column: Column) -> &mut T {
        &mut self.values[column.index()]
    }
}

/// The extended edges of one column set, each seen through a view of a relation's length.
pub type EdgeViews<'a, F> = AllEntities<UnivariateView<'a, F>>;

/// Plain values of every column, e.g. the claimed evaluations at the sumcheck point.
pub type ColumnValues<F> = AllEntities<F>;

impl<F: Field> ColumnValues<F> {
    /// Values of every column at index `i` of each hypercube column.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn at_index(columns: &AllEntities<EvaluationsList<F>>, i: usize) -> Self {
        columns.map(|_, column| column[i])
    }
}
