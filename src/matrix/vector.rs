use core::ops::{Index, IndexMut};

use crate::traits::{Scalar, VectorMut, VectorRef};
use crate::Matrix;

/// A row vector (1×N matrix).
///
/// Supports single-index access (`v[i]`) and implements the fixed-size
/// vector storage contract, so it can be passed directly to the solves.
///
/// # Examples
///
/// ```
/// use spdfact::Vector;
///
/// let v = Vector::from_array([3.0_f64, 4.0]);
/// assert_eq!(v[0], 3.0);
/// assert_eq!(v.dot(&v), 25.0);
/// ```
pub type Vector<T, const N: usize> = Matrix<T, 1, N>;

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Create a vector from a 1D array.
    #[inline]
    pub fn from_array(data: [T; N]) -> Self {
        Self::new([data])
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self[i] * rhs[i];
        }
        sum
    }
}

// ── Vector size aliases ─────────────────────────────────────────────

/// A 2-element row vector.
pub type Vector2<T> = Vector<T, 2>;
/// A 3-element row vector.
pub type Vector3<T> = Vector<T, 3>;
/// A 4-element row vector.
pub type Vector4<T> = Vector<T, 4>;

// Single-index access: v[i] instead of v[(0, i)]
impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i][0]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i][0]
    }
}

impl<T, const N: usize> VectorRef<T> for Vector<T, N> {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, i: usize) -> &T {
        &self.data[i][0]
    }
}

impl<T, const N: usize> VectorMut<T> for Vector<T, N> {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i][0]
    }
}
