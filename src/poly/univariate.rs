//! Fixed-length univariate polynomials in evaluation form.
//!
//! A [`Univariate<F, N>`] stores the evaluations of some polynomial of degree `< N` at the
//! integer points `0, 1, ..., N - 1`. This is the representation used for every round
//! polynomial of the sumcheck protocol and for the per-edge restrictions of the hypercube
//! columns.
//!
//! A [`UnivariateView`] is a borrowed prefix of a univariate. Relations of low degree read
//! the first `LENGTH` entries of data that was extended to the (larger) maximal length of the
//! relation set, without copying it.

use alloc::vec::Vec;
use core::{
    fmt,
    marker::PhantomData,
    ops::{Add, AddAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign},
};

use p3_field::{BasedVectorSpace, ExtensionField, Field};
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeTuple,
};

use super::barycentric;

/// Evaluations `p(0), p(1), ..., p(N - 1)` of a polynomial `p` of degree `< N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Univariate<F, const N: usize> {
    pub evaluations: [F; N],
}

impl<F: Field, const N: usize> Univariate<F, N> {
    /// Number of stored evaluations.
    pub const LENGTH: usize = N;

    #[inline]
    pub const fn new(evaluations: [F; N]) -> Self {
        Self { evaluations }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new([F::ZERO; N])
    }

    /// Returns true when every evaluation is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.evaluations.iter().all(|e| *e == F::ZERO)
    }

    /// Samples `N` uniformly random evaluations.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self
    where
        StandardUniform: Distribution<F>,
    {
        Self::new(core::array::from_fn(|_| rng.random()))
    }

    #[inline]
    #[must_use]
    pub const fn value_at(&self, i: usize) -> F {
        self.evaluations[i]
    }

    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &[F] {
        &self.evaluations
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, F> {
        self.evaluations.iter()
    }

    /// Borrows the first `K` evaluations.
    ///
    /// # Panics
    /// Panics if `K > N`.
    #[inline]
    pub fn view<const K: usize>(&self) -> UnivariateView<'_, F> {
        assert!(K <= N, "cannot view {K} evaluations of a univariate of length {N}");
        UnivariateView::new(&self.evaluations[..K])
    }

    /// Borrows the first `len` evaluations.
    ///
    /// # Panics
    /// Panics if `len > N`.
    #[inline]
    pub fn view_prefix(&self, len: usize) -> UnivariateView<'_, F> {
        assert!(len <= N, "cannot view {len} evaluations of a univariate of length {N}");
        UnivariateView::new(&self.evaluations[..len])
    }

    /// Borrows every evaluation.
    #[inline]
    pub fn full_view(&self) -> UnivariateView<'_, F> {
        UnivariateView::new(&self.evaluations)
    }

    /// Builds a univariate of length `N` from a view.
    ///
    /// The view's data determines a polynomial of degree `< view.len()`; missing entries are
    /// filled by evaluating that polynomial at the remaining points, so no information is lost
    /// and nothing is invented.
    pub fn from_view(view: UnivariateView<'_, F>) -> Self {
        let mut evaluations = [F::ZERO; N];
        barycentric::extend_slice(view.as_slice(), &mut evaluations);
        Self::new(evaluations)
    }

    /// Evaluates the same polynomial at the points `0..M`.
    ///
    /// For `M <= N` this is a truncation.
    pub fn extend_to<const M: usize>(&self) -> Univariate<F, M> {
        barycentric::extend(self)
    }

    /// Evaluates the interpolating polynomial at an arbitrary field point.
    #[must_use]
    pub fn evaluate(&self, z: F) -> F {
        barycentric::evaluate(self, z)
    }

    /// Flattens the evaluations into base-field scalars, in index order.
    ///
    /// This is the transcript wire form: `N * D` scalars where `D` is the extension degree.
    pub fn to_base_scalars<B: Field>(&self) -> Vec<B>
    where
        F: ExtensionField<B>,
    {
        self.evaluations
            .iter()
            .flat_map(|e| {
                <F as BasedVectorSpace<B>>::as_basis_coefficients_slice(e)
                    .iter()
                    .copied()
            })
            .collect()
    }

    /// Inverse of [`Self::to_base_scalars`].
    ///
    /// Returns `None` when the number of scalars is not exactly `N * D`.
    #[must_use]
    pub fn from_base_scalars<B: Field>(scalars: &[B]) -> Option<Self>
    where
        F: ExtensionField<B>,
    {
        let dim = <F as BasedVectorSpace<B>>::DIMENSION;
        if scalars.len() != N * dim {
            return None;
        }
        let mut evaluations = [F::ZERO; N];
        for (out, chunk) in evaluations.iter_mut().zip(scalars.chunks_exact(dim)) {
            *out = <F as BasedVectorSpace<B>>::from_basis_coefficients_slice(chunk)?;
        }
        Some(Self::new(evaluations))
    }
}

impl<F: Field, const N: usize> Default for Univariate<F, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: Field, const N: usize> From<[F; N]> for Univariate<F, N> {
    fn from(evaluations: [F; N]) -> Self {
        Self::new(evaluations)
    }
}

impl<F, const N: usize> Index<usize> for Univariate<F, N> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.evaluations[index]
    }
}

impl<F: Field, const N: usize> AddAssign for Univariate<F, N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.evaluations.iter_mut().zip(rhs.evaluations) {
            *a += b;
        }
    }
}

impl<F: Field, const N: usize> SubAssign for Univariate<F, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.evaluations.iter_mut().zip(rhs.evaluations) {
            *a -= b;
        }
    }
}

impl<F: Field, const N: usize> MulAssign for Univariate<F, N> {
    fn mul_assign(&mut self, rhs: Self) {
        for (a, b) in self.evaluations.iter_mut().zip(rhs.evaluations) {
            *a *= b;
        }
    }
}

impl<F: Field, const N: usize> AddAssign<F> for Univariate<F, N> {
    fn add_assign(&mut self, rhs: F) {
        for a in &mut self.evaluations {
            *a += rhs;
        }
    }
}

impl<F: Field, const N: usize> SubAssign<F> for Univariate<F, N> {
    fn sub_assign(&mut self, rhs: F) {
        for a in &mut self.evaluations {
            *a -= rhs;
        }
    }
}

impl<F: Field, const N: usize> MulAssign<F> for Univariate<F, N> {
    fn mul_assign(&mut self, rhs: F) {
        for a in &mut self.evaluations {
            *a *= rhs;
        }
    }
}

impl<F: Field, const N: usize> Add for Univariate<F, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<F: Field, const N: usize> Sub for Univariate<F, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<F: Field, const N: usize> Mul for Univariate<F, N> {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl<F: Field, const N: usize> Add<F> for Univariate<F, N> {
    type Output = Self;

    fn add(mut self, rhs: F) -> Self {
        self += rhs;
        self
    }
}

impl<F: Field, const N: usize> Sub<F> for Univariate<F, N> {
    type Output = Self;

    fn sub(mut self, rhs: F) -> Self {
        self -= rhs;
        self
    }
}

impl<F: Field, const N: usize> Mul<F> for Univariate<F, N> {
    type Output = Self;

    fn mul(mut self, rhs: F) -> Self {
        self *= rhs;
        self
    }
}

impl<F: Field, const N: usize> Neg for Univariate<F, N> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for a in &mut self.evaluations {
            *a = -*a;
        }
        self
    }
}

// Arithmetic against a view only touches the entries the view covers.
//
// Mixing lengths is allowed as long as the view is at least as long as the univariate:
// the univariate then reads the view's prefix. A shorter view is a contract violation.

fn check_view_len<const N: usize>(len: usize) {
    assert!(
        len >= N,
        "view of length {len} is too short for a univariate of length {N}"
    );
}

impl<F: Field, const N: usize> AddAssign<UnivariateView<'_, F>> for Univariate<F, N> {
    fn add_assign(&mut self, rhs: UnivariateView<'_, F>) {
        check_view_len::<N>(rhs.len());
        for (a, &b) in self.evaluations.iter_mut().zip(rhs.iter()) {
            *a += b;
        }
    }
}

impl<F: Field, const N: usize> SubAssign<UnivariateView<'_, F>> for Univariate<F, N> {
    fn sub_assign(&mut self, rhs: UnivariateView<'_, F>) {
        check_view_len::<N>(rhs.len());
        for (a, &b) in self.evaluations.iter_mut().zip(rhs.iter()) {
            *a -= b;
        }
    }
}

impl<F: Field, const N: usize> MulAssign<UnivariateView<'_, F>> for Univariate<F, N> {
    fn mul_assign(&mut self, rhs: UnivariateView<'_, F>) {
        check_view_len::<N>(rhs.len());
        for (a, &b) in self.evaluations.iter_mut().zip(rhs.iter()) {
            *a *= b;
        }
    }
}

impl<F: Field, const N: usize> Add<UnivariateView<'_, F>> for Univariate<F, N> {
    type Output = Self;

    fn add(mut self, rhs: UnivariateView<'_, F>) -> Self {
        self += rhs;
        self
    }
}

impl<F: Field, const N: usize> Sub<UnivariateView<'_, F>> for Univariate<F, N> {
    type Output = Self;

    fn sub(mut self, rhs: UnivariateView<'_, F>) -> Self {
        self -= rhs;
        self
    }
}

impl<F: Field, const N: usize> Mul<UnivariateView<'_, F>> for Univariate<F, N> {
    type Output = Self;

    fn mul(mut self, rhs: UnivariateView<'_, F>) -> Self {
        self *= rhs;
        self
    }
}

impl<F: Serialize, const N: usize> Serialize for Univariate<F, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Fixed-size layout: exactly N elements, no length prefix.
        let mut tuple = serializer.serialize_tuple(N)?;
        for e in &self.evaluations {
            tuple.serialize_element(e)?;
        }
        tuple.end()
    }
}

impl<'de, F: Field + Deserialize<'de>, const N: usize> Deserialize<'de> for Univariate<F, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UnivariateVisitor<F, const N: usize>(PhantomData<F>);

        impl<'de, F: Field + Deserialize<'de>, const N: usize> Visitor<'de> for UnivariateVisitor<F, N> {
            type Value = Univariate<F, N>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{N} field elements")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut evaluations = [F::ZERO; N];
                for (i, slot) in evaluations.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                Ok(Univariate::new(evaluations))
            }
        }

        deserializer.deserialize_tuple(N, UnivariateVisitor::<F, N>(PhantomData))
    }
}

/// Non-owning alias over the first `len` evaluations of a [`Univariate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnivariateView<'a, F> {
    evaluations: &'a [F],
}

impl<'a, F: Field> UnivariateView<'a, F> {
    #[inline]
    pub const fn new(evaluations: &'a [F]) -> Self {
        Self { evaluations }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.evaluations.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn value_at(&self, i: usize) -> F {
        self.evaluations[i]
    }

    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &'a [F] {
        self.evaluations
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'a, F> {
        self.evaluations.iter()
    }

    /// Materializes the view as a univariate of length `N`.
    pub fn to_univariate<const N: usize>(self) -> Univariate<F, N> {
        Univariate::from_view(self)
    }
}

impl<F> Index<usize> for UnivariateView<'_, F> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.evaluations[index]
    }
}

impl<'a, F: Field, const N: usize> From<&'a Univariate<F, N>> for UnivariateView<'a, F> {
    fn from(value: &'a Univariate<F, N>) -> Self {
        value.full_view()
    }
}
