mod norm;
mod ops;
mod vector;

pub use vector::DynVector;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::linalg::{CholeskyDecomposition, LdltDecomposition, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

/// Dynamically-sized heap-allocated matrix.
///
/// Column-major `Vec<T>` storage, matching the layout of fixed-size [`Matrix`](crate::Matrix).
/// Dimensions are set at runtime and may be changed through
/// [`MatrixMut::set_size`], so the decompositions resize a `DynMatrix`
/// output argument instead of rejecting it.
///
/// # Examples
///
/// ```
/// use spdfact::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b = DynMatrix::eye(3, 0.0_f64);
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Create an `nrows x ncols` matrix filled with zeros.
    ///
    /// The `_zero` parameter is only used for type inference.
    pub fn zeros(nrows: usize, ncols: usize, _zero: T) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an `n x n` identity matrix.
    ///
    /// The `_zero` parameter is only used for type inference.
    pub fn eye(n: usize, _zero: T) -> Self {
        let mut m = Self::zeros(n, n, T::zero());
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use spdfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_fn(nrows, ncols, |i, j| row_major[i * ncols + j])
    }

    /// Create a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Transpose: (M×N) → (N×M).
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }
}

impl<T> DynMatrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// View the column-major data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Convenience constructors for the SPD decompositions.
impl<T: FloatScalar> DynMatrix<T> {
    /// Cholesky decomposition (`A = L * L^T`).
    ///
    /// ```
    /// use spdfact::{DynMatrix, DynVector};
    ///
    /// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
    /// let mut chol = a.cholesky().unwrap();
    ///
    /// let b = DynVector::from_slice(&[8.0, 7.0]);
    /// let mut x = DynVector::zeros(0, 0.0);
    /// chol.solve(&mut x, &b).unwrap();
    /// assert!((x[0] - 1.25).abs() < 1e-12);
    /// assert!((x[1] - 1.5).abs() < 1e-12);
    /// ```
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::from_matrix(self)
    }

    /// LDLᵀ decomposition (`A = L * D * L^T`, unit lower-triangular `L`).
    pub fn ldlt(&self) -> Result<LdltDecomposition<T>, LinalgError> {
        LdltDecomposition::from_matrix(self)
    }
}

// ── Storage contract ────────────────────────────────────────────────

impl<T> MatrixRef<T> for DynMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[col * self.nrows + row]
    }

    fn col_into(&self, col: usize, out: &mut [T])
    where
        T: Copy,
    {
        let start = col * self.nrows;
        out[..self.nrows].copy_from_slice(&self.data[start..start + self.nrows]);
    }
}

impl<T: Scalar> MatrixMut<T> for DynMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[col * self.nrows + row]
    }

    fn set_col(&mut self, col: usize, src: &[T]) {
        let start = col * self.nrows;
        self.data[start..start + self.nrows].copy_from_slice(&src[..self.nrows]);
    }

    fn is_fixed_size(&self) -> bool {
        false
    }

    fn set_size(&mut self, nrows: usize, ncols: usize) {
        if nrows != self.nrows || ncols != self.ncols {
            self.data.clear();
            self.data.resize(nrows * ncols, T::zero());
            self.nrows = nrows;
            self.ncols = ncols;
        }
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DynMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[col * self.nrows + row]
    }
}

impl<T> IndexMut<(usize, usize)> for DynMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[col * self.nrows + row]
    }
}

// ── Conversions ─────────────────────────────────────────────────────
