use alloc::vec;
use alloc::vec::Vec;

use crate::dynmatrix::DynMatrix;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, VectorMut, VectorRef};

use super::buffer::DenseBuffer;
use super::condition::{greedy_rhs, norm_inf_slice, norm_inf_with};
use super::triangular::{back_substitute_lt_in_place, forward_substitute_in_place};
use super::{conform_matrix, conform_vector, LinalgError};

/// Cholesky decomposition `M = L * L^T` of a symmetric positive-definite
/// matrix, with incremental update and downdate.
///
/// The factor lives in an internal row-major buffer that only ever grows, so a
/// single object can be refactored, extended one row/column at a time with
/// [`add_row_and_column`](Self::add_row_and_column) and contracted with
/// [`delete_row_and_column`](Self::delete_row_and_column) without
/// reallocating on every call. Only the lower triangle of the input is used.
///
/// # Example
///
/// ```
/// use spdfact::{CholeskyDecomposition, DynMatrix, DynVector};
///
/// let m = DynMatrix::from_rows(3, 3, &[
///     4.0_f64, 12.0, -16.0,
///     12.0, 37.0, -43.0,
///     -16.0, -43.0, 98.0,
/// ]);
/// let mut chol = CholeskyDecomposition::new();
/// chol.factor(&m).unwrap();
///
/// let l = chol.l_full().unwrap();
/// assert!((l[(2, 0)] + 8.0).abs() < 1e-12);
/// assert!((chol.determinant().unwrap() - 36.0).abs() < 1e-9);
///
/// let b = DynVector::from_slice(&[1.0, 2.0, 3.0]);
/// let mut x = DynVector::zeros(0, 0.0);
/// chol.solve(&mut x, &b).unwrap();
/// let r = &m * &x;
/// assert!((r[2] - 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    buf: DenseBuffer<T>,
    sol: Vec<T>,
    initialized: bool,
}

impl<T: FloatScalar> Default for CholeskyDecomposition<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Empty, uninitialized decomposition.
    pub fn new() -> Self {
        Self {
            buf: DenseBuffer::new(),
            sol: Vec::new(),
            initialized: false,
        }
    }

    /// Empty decomposition with room for an order-`cap` factor.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: DenseBuffer::with_capacity(cap),
            sol: vec![T::zero(); cap],
            initialized: false,
        }
    }

    /// Factor `m` into a new decomposition.
    pub fn from_matrix(m: &(impl MatrixRef<T> + ?Sized)) -> Result<Self, LinalgError> {
        let mut chol = Self::new();
        chol.factor(m)?;
        Ok(chol)
    }

    /// Factor the symmetric positive-definite matrix `m`, discarding any
    /// previous factor.
    ///
    /// Returns `SizeMismatch` if `m` is not square, leaving `self` untouched,
    /// and `NotPositiveDefinite` if a pivot is negative or negligible relative
    /// to the largest diagonal entry, leaving `self` empty and uninitialized.
    pub fn factor(&mut self, m: &(impl MatrixRef<T> + ?Sized)) -> Result<(), LinalgError> {
        if m.nrows() != m.ncols() {
            return Err(LinalgError::SizeMismatch);
        }
        let n = m.nrows();
        self.initialized = false;
        self.ensure_capacity(n);
        self.buf.load(m);

        let result = gaxpy_cholesky(&mut self.buf);
        if let Err(e) = result {
            self.buf.set_order(0);
            return Err(e);
        }
        self.initialized = true;
        Ok(())
    }

    /// Grow the internal storage to hold an order-`cap` factor.
    pub fn ensure_capacity(&mut self, cap: usize) {
        if self.buf.ensure_capacity(cap) {
            self.sol.resize(self.buf.width(), T::zero());
        }
    }

    /// Reset to an empty, uninitialized decomposition. Storage is kept.
    pub fn clear(&mut self) {
        self.buf.set_order(0);
        self.initialized = false;
    }

    /// Order of the current factor.
    #[inline]
    pub fn order(&self) -> usize {
        self.buf.order()
    }

    /// Largest order storable without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.width()
    }

    /// Whether a factor is available for queries and solves.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Raw row-major factor storage. `L[i][j]` (`i >= j`) is at
    /// `as_slice()[i * width() + j]`; everything else is scratch.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Row stride of [`as_slice`](Self::as_slice).
    #[inline]
    pub fn width(&self) -> usize {
        self.buf.width()
    }

    fn ready(&self) -> Result<usize, LinalgError> {
        if self.initialized {
            Ok(self.buf.order())
        } else {
            Err(LinalgError::NotInitialized)
        }
    }
}

/// In-place Gaxpy Cholesky (Golub & Van Loan, Alg. 4.2.1) on the working
/// block of `buf`. On success the lower triangle holds `L`.
fn gaxpy_cholesky<T: FloatScalar>(buf: &mut DenseBuffer<T>) -> Result<(), LinalgError> {
    let n = buf.order();
    let zero = T::zero();

    let mut anorm = zero;
    for i in 0..n {
        let d = buf[(i, i)];
        if d < zero {
            log::debug!("cholesky: negative diagonal {:?} at {}", d, i);
            return Err(LinalgError::NotPositiveDefinite);
        }
        if d > anorm {
            anorm = d;
        }
    }

    for j in 0..n {
        for i in j..n {
            let mut sum = buf[(i, j)];
            for k in 0..j {
                sum = sum - buf[(i, k)] * buf[(j, k)];
            }
            buf[(i, j)] = sum;
        }
        let pivot = buf[(j, j)];
        // `!(>=)` also rejects NaN
        if !(pivot >= zero) || anorm + pivot.sqrt() == anorm {
            log::debug!("cholesky: rejected pivot {:?} at column {}", pivot, j);
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = pivot.sqrt();
        for i in j..n {
            buf[(i, j)] = buf[(i, j)] / ljj;
        }
    }
    Ok(())
}

// ── Factor access ───────────────────────────────────────────────────

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Write `L` (zeros above the diagonal) into `l`, resizing it if allowed.
    pub fn l_into<M>(&self, l: &mut M) -> Result<(), LinalgError>
    where
        M: MatrixMut<T> + ?Sized,
    {
        let n = self.ready()?;
        conform_matrix::<T, _>(l, n, n)?;
        let mut row = vec![T::zero(); n];
        for i in 0..n {
            row[..=i].copy_from_slice(self.buf.row(i, i + 1));
            for x in row[i + 1..].iter_mut() {
                *x = T::zero();
            }
            l.set_row(i, &row);
        }
        Ok(())
    }

    /// `L` as a new [`DynMatrix`].
    pub fn l_full(&self) -> Result<DynMatrix<T>, LinalgError> {
        let mut l = DynMatrix::zeros(0, 0, T::zero());
        self.l_into(&mut l)?;
        Ok(l)
    }

    /// `det(M) = (∏ L[i][i])²`.
    pub fn determinant(&self) -> Result<T, LinalgError> {
        let n = self.ready()?;
        let mut prod = T::one();
        for i in 0..n {
            prod = prod * self.buf[(i, i)];
        }
        Ok(prod * prod)
    }

    /// `ln(det(M)) = 2 Σ ln(L[i][i])`, which does not overflow for large
    /// orders.
    pub fn ln_det(&self) -> Result<T, LinalgError> {
        let n = self.ready()?;
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self.buf[(i, i)].ln();
        }
        Ok(sum + sum)
    }

    /// Estimate the infinity-norm condition number of `m`, the matrix this
    /// decomposition was factored from.
    ///
    /// `m` is read only for its norm. An order-0 factor has estimate 0.
    pub fn condition_estimate(&self, m: &(impl MatrixRef<T> + ?Sized)) -> Result<T, LinalgError> {
        let n = self.ready()?;
        if m.nrows() != n || m.ncols() != n {
            return Err(LinalgError::SizeMismatch);
        }
        if n == 0 {
            return Ok(T::zero());
        }

        let mut y = greedy_rhs(&self.buf, false);
        back_substitute_lt_in_place(&self.buf, &mut y);
        let r_norm = norm_inf_slice(&y);
        forward_substitute_in_place(&self.buf, &mut y);
        back_substitute_lt_in_place(&self.buf, &mut y);
        let z_norm = norm_inf_slice(&y);

        let mut row = vec![T::zero(); n];
        let m_norm = norm_inf_with(m, &mut row);
        Ok(m_norm * z_norm / r_norm)
    }
}

// ── Solves ──────────────────────────────────────────────────────────

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Solve `M * x = b`. `b` must have length `order()`; `x` is resized if
    /// allowed.
    pub fn solve<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        self.solve_vector_with(x, b, |l, s| {
            forward_substitute_in_place(l, s);
            back_substitute_lt_in_place(l, s);
        })
    }

    /// Solve `M * X = B` column by column.
    pub fn solve_matrix<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        self.solve_columns_with(x, b, |l, s| {
            forward_substitute_in_place(l, s);
            back_substitute_lt_in_place(l, s);
        })
    }

    /// Solve `M * x = b` on the leading `order()` entries of two slices.
    pub fn solve_slice(&self, x: &mut [T], b: &[T]) -> Result<(), LinalgError> {
        let n = self.ready()?;
        if x.len() < n || b.len() < n {
            return Err(LinalgError::SizeMismatch);
        }
        x[..n].copy_from_slice(&b[..n]);
        self.solve_in_place(x)
    }

    /// Overwrite the leading `order()` entries of `x` with `M⁻¹ x`.
    ///
    /// ```
    /// use spdfact::Matrix;
    /// let chol = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]).cholesky().unwrap();
    /// let mut x = [8.0, 7.0, 100.0];
    /// chol.solve_in_place(&mut x).unwrap();
    /// assert!((x[0] - 1.25).abs() < 1e-12);
    /// assert_eq!(x[2], 100.0);
    /// ```
    pub fn solve_in_place(&self, x: &mut [T]) -> Result<(), LinalgError> {
        let n = self.ready()?;
        if x.len() < n {
            return Err(LinalgError::SizeMismatch);
        }
        forward_substitute_in_place(&self.buf, &mut x[..n]);
        back_substitute_lt_in_place(&self.buf, &mut x[..n]);
        Ok(())
    }

    /// Solve `L * x = b`.
    pub fn solve_l<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        self.solve_vector_with(x, b, |l, s| forward_substitute_in_place(l, s))
    }

    /// Solve `L * X = B` column by column.
    pub fn solve_l_matrix<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        self.solve_columns_with(x, b, |l, s| forward_substitute_in_place(l, s))
    }

    /// Solve the row problem `x * L = b`.
    pub fn left_solve_l<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        self.solve_vector_with(x, b, |l, s| back_substitute_lt_in_place(l, s))
    }

    /// Solve `X * L = B` row by row. `B` must have `order()` columns.
    pub fn left_solve_l_matrix<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        let n = self.ready()?;
        if b.ncols() != n {
            return Err(LinalgError::SizeMismatch);
        }
        conform_matrix::<T, _>(x, b.nrows(), n)?;
        let sol = &mut self.sol[..n];
        for i in 0..b.nrows() {
            b.row_into(i, sol);
            back_substitute_lt_in_place(&self.buf, sol);
            x.set_row(i, sol);
        }
        Ok(())
    }

    /// Write `M⁻¹` into `r`, resizing it if allowed.
    pub fn inverse_into<R>(&mut self, r: &mut R) -> Result<(), LinalgError>
    where
        R: MatrixMut<T> + ?Sized,
    {
        let n = self.ready()?;
        conform_matrix::<T, _>(r, n, n)?;
        let sol = &mut self.sol[..n];
        for j in 0..n {
            for (i, x) in sol.iter_mut().enumerate() {
                *x = if i == j { T::one() } else { T::zero() };
            }
            forward_substitute_in_place(&self.buf, sol);
            back_substitute_lt_in_place(&self.buf, sol);
            r.set_col(j, sol);
        }
        Ok(())
    }

    /// `M⁻¹` as a new [`DynMatrix`].
    pub fn inverse(&mut self) -> Result<DynMatrix<T>, LinalgError> {
        let mut r = DynMatrix::zeros(0, 0, T::zero());
        self.inverse_into(&mut r)?;
        Ok(r)
    }

    fn solve_vector_with<X, B>(
        &mut self,
        x: &mut X,
        b: &B,
        kernel: impl Fn(&DenseBuffer<T>, &mut [T]),
    ) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        let n = self.ready()?;
        if b.len() != n {
            return Err(LinalgError::SizeMismatch);
        }
        conform_vector::<T, _>(x, n)?;
        let sol = &mut self.sol[..n];
        b.copy_to(sol);
        kernel(&self.buf, sol);
        x.copy_from(sol);
        Ok(())
    }

    fn solve_columns_with<X, B>(
        &mut self,
        x: &mut X,
        b: &B,
        kernel: impl Fn(&DenseBuffer<T>, &mut [T]),
    ) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        let n = self.ready()?;
        if b.nrows() != n {
            return Err(LinalgError::SizeMismatch);
        }
        conform_matrix::<T, _>(x, n, b.ncols())?;
        let sol = &mut self.sol[..n];
        for j in 0..b.ncols() {
            b.col_into(j, sol);
            kernel(&self.buf, sol);
            x.set_col(j, sol);
        }
        Ok(())
    }
}

// ── Incremental update / downdate ───────────────────────────────────

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Extend the factor of `M` to that of
    ///
    /// ```text
    /// [ M    c ]
    /// [ c^T  d ]
    /// ```
    ///
    /// where `c = col[..n]` and `d = col[n]`, `n = order()`. The new pivot
    /// `d - |L⁻¹ c|²` must exceed `tol`; otherwise the update is rejected,
    /// `Ok(false)` is returned and the factor is unchanged.
    ///
    /// An empty decomposition (fresh or cleared) may be grown this way one
    /// row at a time.
    ///
    /// ```
    /// use spdfact::CholeskyDecomposition;
    ///
    /// let mut chol = CholeskyDecomposition::<f64>::new();
    /// assert!(chol.try_add_row_and_column(&[4.0][..], 0.0).unwrap());
    /// assert!(chol.try_add_row_and_column(&[12.0, 37.0][..], 0.0).unwrap());
    /// // would make the matrix indefinite
    /// assert!(!chol.try_add_row_and_column(&[1.0, 1.0, 0.0][..], 1e-12).unwrap());
    /// assert_eq!(chol.order(), 2);
    /// ```
    pub fn try_add_row_and_column<V>(&mut self, col: &V, tol: T) -> Result<bool, LinalgError>
    where
        V: VectorRef<T> + ?Sized,
    {
        let n = self.buf.order();
        if !self.initialized && n > 0 {
            return Err(LinalgError::NotInitialized);
        }
        if col.len() < n + 1 {
            return Err(LinalgError::SizeMismatch);
        }
        self.ensure_capacity(n + 1);

        let sol = &mut self.sol[..n];
        for (k, x) in sol.iter_mut().enumerate() {
            *x = *col.get(k);
        }
        forward_substitute_in_place(&self.buf, sol);
        let d = sol.iter().fold(*col.get(n), |acc, &l| acc - l * l);
        // `!(>)` also rejects NaN
        if !(d > tol) {
            log::debug!("cholesky: update rejected, pivot {:?} at order {}", d, n);
            return Ok(false);
        }

        self.buf.set_order(n + 1);
        self.buf.row_mut(n, n).copy_from_slice(sol);
        self.buf[(n, n)] = d.sqrt();
        self.initialized = true;
        Ok(true)
    }

    /// [`try_add_row_and_column`](Self::try_add_row_and_column) with zero
    /// tolerance, reporting rejection as `NotPositiveDefinite`.
    pub fn add_row_and_column<V>(&mut self, col: &V) -> Result<(), LinalgError>
    where
        V: VectorRef<T> + ?Sized,
    {
        if self.try_add_row_and_column(col, T::zero())? {
            Ok(())
        } else {
            Err(LinalgError::NotPositiveDefinite)
        }
    }

    /// Replace the factor of `M` with that of `M` without row and column
    /// `idx`, using a sweep of Givens rotations.
    pub fn delete_row_and_column(&mut self, idx: usize) -> Result<(), LinalgError> {
        let n = self.ready()?;
        if idx >= n {
            return Err(LinalgError::IndexOutOfRange { index: idx, size: n });
        }

        // Dropping row `idx` of L leaves rows idx+1.. one entry too long;
        // rotate columns (i-1, i) to clear L[i][i].
        let buf = &mut self.buf;
        for i in (idx + 1)..n {
            let z1 = buf[(i, i - 1)];
            let z2 = buf[(i, i)];
            let p = z1.hypot(z2);
            let c = z1 / p;
            let s = z2 / p;
            buf[(i, i - 1)] = p;
            for k in (i + 1)..n {
                let a = buf[(k, i - 1)];
                let b = buf[(k, i)];
                buf[(k, i - 1)] = c * a + s * b;
                buf[(k, i)] = s * a - c * b;
            }
        }
        for i in (idx + 1)..n {
            for j in 0..i {
                buf[(i - 1, j)] = buf[(i, j)];
            }
        }
        buf.set_order(n - 1);
        log::debug!("cholesky: deleted row/column {}, order now {}", idx, n - 1);
        Ok(())
    }
}
