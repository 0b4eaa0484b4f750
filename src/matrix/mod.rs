pub mod aliases;
mod ops;
pub mod vector;

use core::ops::{Index, IndexMut};

use crate::linalg::{CholeskyDecomposition, LdltDecomposition, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

/// Fixed-size matrix with `M` rows and `N` columns.
///
/// Storage is column-major: `data[col][row]`.
/// Stack-allocated. Its dimensions cannot change, so decompositions that
/// write into a `Matrix` of the wrong shape fail with
/// [`LinalgError::SizeMismatch`] instead of resizing it.
///
/// # Examples
///
/// ```
/// use spdfact::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b: Matrix<f64, 3, 3> = Matrix::eye();
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize> {
    pub(crate) data: [[T; M]; N],
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix from a row-major 2D array.
    ///
    /// The input is `[[row0], [row1], ...]` (M arrays of N elements each).
    #[inline]
    pub fn new(rows: [[T; N]; M]) -> Self
    where
        T: Scalar,
    {
        let mut m = Self::zeros();
        for (i, row) in rows.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                m.data[j][i] = x;
            }
        }
        m
    }

    /// Number of rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        M
    }

    /// Number of columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        N
    }
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix filled with zeros.
    pub fn zeros() -> Self {
        Self {
            data: [[T::zero(); M]; N],
        }
    }

    /// Create a matrix by evaluating `f(row, col)` for every element.
    ///
    /// ```
    /// use spdfact::Matrix;
    /// let m: Matrix<f64, 2, 3> = Matrix::from_fn(|i, j| (i * 3 + j) as f64);
    /// assert_eq!(m[(1, 2)], 5.0);
    /// ```
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self {
        let mut out = Self::zeros();
        for j in 0..N {
            for i in 0..M {
                out.data[j][i] = f(i, j);
            }
        }
        out
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Create an identity matrix (square matrices only).
    pub fn eye() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = T::one();
        }
        m
    }
}

/// Convenience constructors for the SPD decompositions.
impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Cholesky decomposition (`A = L * L^T`).
    ///
    /// ```
    /// use spdfact::Matrix;
    /// let spd = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]);
    /// let chol = spd.cholesky().unwrap();
    /// assert!((chol.determinant().unwrap() - 8.0).abs() < 1e-12);
    /// ```
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::from_matrix(self)
    }

    /// LDLᵀ decomposition (`A = L * D * L^T`, unit lower-triangular `L`).
    pub fn ldlt(&self) -> Result<LdltDecomposition<T>, LinalgError> {
        LdltDecomposition::from_matrix(self)
    }
}

impl<T, const M: usize, const N: usize> MatrixRef<T> for Matrix<T, M, N> {
    #[inline]
    fn nrows(&self) -> usize {
        M
    }

    #[inline]
    fn ncols(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[col][row]
    }

    fn col_into(&self, col: usize, out: &mut [T])
    where
        T: Copy,
    {
        out[..M].copy_from_slice(&self.data[col]);
    }
}

impl<T, const M: usize, const N: usize> MatrixMut<T> for Matrix<T, M, N> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[col][row]
    }

    fn set_col(&mut self, col: usize, src: &[T])
    where
        T: Copy,
    {
        self.data[col].copy_from_slice(&src[..M]);
    }
}

// Index by (row, col) tuple
impl<T, const M: usize, const N: usize> Index<(usize, usize)> for Matrix<T, M, N> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[col][row]
    }
}

impl<T, const M: usize, const N: usize> IndexMut<(usize, usize)> for Matrix<T, M, N> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[col][row]
    }
}

pub use aliases::*;
