use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, Scalar, VectorMut, VectorRef};

use super::DynMatrix;

/// Dynamically-sized vector (wraps a 1×N `DynMatrix`).
///
/// Implements the resizable vector storage contract, so a solve writing
/// into a `DynVector` of the wrong length resizes it.
///
/// # Examples
///
/// ```
/// use spdfact::DynVector;
///
/// let v = DynVector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynVector<T> {
    pub(crate) inner: DynMatrix<T>,
}

impl<T: Scalar> DynVector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            inner: DynMatrix::from_fn(1, data.len(), |_, j| data[j]),
        }
    }

    /// Create a vector from an owned `Vec`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self::from_slice(&data)
    }

    /// Create a zero vector of length `n`.
    ///
    /// The `_zero` parameter is only used for type inference.
    pub fn zeros(n: usize, _zero: T) -> Self {
        Self {
            inner: DynMatrix::zeros(1, n, T::zero()),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.ncols()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dot product.
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        let mut sum = T::zero();
        for i in 0..self.len() {
            sum = sum + self[i] * rhs[i];
        }
        sum
    }

    /// View the vector data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.inner[(0, i)]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.inner[(0, i)]
    }
}

// ── Storage contract ────────────────────────────────────────────────

impl<T> VectorRef<T> for DynVector<T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.ncols()
    }

    #[inline]
    fn get(&self, i: usize) -> &T {
        &self.inner[(0, i)]
    }

    fn copy_to(&self, out: &mut [T])
    where
        T: Copy,
    {
        let s = self.inner.as_slice();
        out[..s.len()].copy_from_slice(s);
    }
}

impl<T: Scalar> VectorMut<T> for DynVector<T> {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self.inner[(0, i)]
    }

    fn is_fixed_size(&self) -> bool {
        false
    }

    fn set_len(&mut self, n: usize) {
        self.inner.set_size(1, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_slice_and_vec() {
        let v = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], 3.0);
        assert_eq!(DynVector::from_vec(vec![1.0, 2.0, 3.0]), v);
    }

    #[test]
    fn index_mut() {
        let mut v = DynVector::zeros(3, 0.0_f64);
        v[1] = 42.0;
        assert_eq!(v.as_slice(), &[0.0, 42.0, 0.0]);
    }

    #[test]
    fn dot_product() {
        let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn resizes_through_contract() {
        let mut v = DynVector::zeros(1, 0.0_f64);
        assert!(!VectorMut::is_fixed_size(&v));
        v.set_len(4);
        assert_eq!(v.len(), 4);
        v.copy_from(&[1.0, 2.0, 3.0, 4.0]);
        let mut out = [0.0; 4];
        v.copy_to(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }
}
