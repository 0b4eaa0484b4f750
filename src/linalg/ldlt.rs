use alloc::vec;
use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, VectorMut, VectorRef};

use super::buffer::DenseBuffer;
use super::condition::{greedy_rhs, norm_inf_slice, norm_inf_with};
use super::triangular::{
    divide_by_diagonal, unit_back_substitute_lt_in_place, unit_forward_substitute_in_place,
};
use super::{conform_matrix, conform_vector, LinalgError};

/// `L * D * L^T` decomposition of a symmetric positive-definite matrix, with
/// `L` unit lower-triangular and `D` diagonal. No square roots are taken.
///
/// Offers the same solves and queries as
/// [`CholeskyDecomposition`](super::CholeskyDecomposition) but has no
/// incremental `add_row_and_column` / `delete_row_and_column`; use the
/// Cholesky type when the factor must grow or shrink in place.
///
/// ```
/// use spdfact::DynMatrix;
///
/// let m = DynMatrix::from_rows(3, 3, &[
///     4.0_f64, 12.0, -16.0,
///     12.0, 37.0, -43.0,
///     -16.0, -43.0, 98.0,
/// ]);
/// let ldlt = m.ldlt().unwrap();
/// let d = ldlt.d_vector().unwrap();
/// assert!((d[2] - 9.0).abs() < 1e-12);
/// assert!((ldlt.determinant().unwrap() - 36.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LdltDecomposition<T> {
    buf: DenseBuffer<T>,
    sol: Vec<T>,
    initialized: bool,
}

impl<T: FloatScalar> Default for LdltDecomposition<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> LdltDecomposition<T> {
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
        let mut ldlt = Self::new();
        ldlt.factor(m)?;
        Ok(ldlt)
    }

    /// Factor `m`, discarding any previous factor. Failure semantics match
    /// [`CholeskyDecomposition::factor`](super::CholeskyDecomposition::factor).
    pub fn factor(&mut self, m: &(impl MatrixRef<T> + ?Sized)) -> Result<(), LinalgError> {
        if m.nrows() != m.ncols() {
            return Err(LinalgError::SizeMismatch);
        }
        let n = m.nrows();
        self.initialized = false;
        self.ensure_capacity(n);
        self.buf.load(m);

        if let Err(e) = ldlt_in_place(&mut self.buf, &mut self.sol[..n]) {
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

    /// Raw row-major storage: strict lower triangle holds `L`, the diagonal
    /// holds `D`. Row stride is [`width`](Self::width).
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

/// LDLᵀ by Golub & Van Loan, Alg. 4.1.2, using `v` (length `n`) for the
/// products `L[j][k] * D[k]`.
fn ldlt_in_place<T: FloatScalar>(buf: &mut DenseBuffer<T>, v: &mut [T]) -> Result<(), LinalgError> {
    let n = buf.order();
    let zero = T::zero();

    let mut anorm = zero;
    for i in 0..n {
        let d = buf[(i, i)];
        if d < zero {
            log::debug!("ldlt: negative diagonal {:?} at {}", d, i);
            return Err(LinalgError::NotPositiveDefinite);
        }
        if d > anorm {
            anorm = d;
        }
    }

    for j in 0..n {
        for k in 0..j {
            v[k] = buf[(j, k)] * buf[(k, k)];
        }
        let dj = buf[(j, j)] - dot(buf.row(j, j), &v[..j]);
        if !(dj >= zero) || anorm + dj == anorm {
            log::debug!("ldlt: rejected pivot {:?} at column {}", dj, j);
            return Err(LinalgError::NotPositiveDefinite);
        }
        buf[(j, j)] = dj;
        for i in (j + 1)..n {
            let s = dot(buf.row(i, j), &v[..j]);
            buf[(i, j)] = (buf[(i, j)] - s) / dj;
        }
    }
    Ok(())
}

#[inline]
fn dot<T: FloatScalar>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

fn ldlt_solve<T: FloatScalar>(buf: &DenseBuffer<T>, x: &mut [T]) {
    unit_forward_substitute_in_place(buf, x);
    divide_by_diagonal(buf, x);
    unit_back_substitute_lt_in_place(buf, x);
}

// ── Queries ─────────────────────────────────────────────────────────

impl<T: FloatScalar> LdltDecomposition<T> {
    /// Write the unit lower-triangular `L` into `l`, resizing it if allowed.
    pub fn l_into<M>(&self, l: &mut M) -> Result<(), LinalgError>
    where
        M: MatrixMut<T> + ?Sized,
    {
        let n = self.ready()?;
        conform_matrix::<T, _>(l, n, n)?;
        let mut row = vec![T::zero(); n];
        for i in 0..n {
            row[..i].copy_from_slice(self.buf.row(i, i));
            row[i] = T::one();
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

    /// Write the diagonal of `D` into `d`, resizing it if allowed.
    pub fn d_into<V>(&self, d: &mut V) -> Result<(), LinalgError>
    where
        V: VectorMut<T> + ?Sized,
    {
        let n = self.ready()?;
        conform_vector::<T, _>(d, n)?;
        for i in 0..n {
            *d.get_mut(i) = self.buf[(i, i)];
        }
        Ok(())
    }

    /// The diagonal of `D` as a new [`DynVector`].
    pub fn d_vector(&self) -> Result<DynVector<T>, LinalgError> {
        let mut d = DynVector::zeros(0, T::zero());
        self.d_into(&mut d)?;
        Ok(d)
    }

    /// `det(M) = ∏ D[i]`.
    pub fn determinant(&self) -> Result<T, LinalgError> {
        let n = self.ready()?;
        Ok((0..n).fold(T::one(), |acc, i| acc * self.buf[(i, i)]))
    }

    /// `ln(det(M)) = Σ ln(D[i])`.
    pub fn ln_det(&self) -> Result<T, LinalgError> {
        let n = self.ready()?;
        Ok((0..n).fold(T::zero(), |acc, i| acc + self.buf[(i, i)].ln()))
    }

    /// Infinity-norm condition estimate of `m`, the matrix that was factored.
    pub fn condition_estimate(&self, m: &(impl MatrixRef<T> + ?Sized)) -> Result<T, LinalgError> {
        let n = self.ready()?;
        if m.nrows() != n || m.ncols() != n {
            return Err(LinalgError::SizeMismatch);
        }
        if n == 0 {
            return Ok(T::zero());
        }

        // D is left out of the greedy step and folded into the solves:
        // D L^T r = y, L D w = r, L^T z = w.
        let mut y = greedy_rhs(&self.buf, true);
        divide_by_diagonal(&self.buf, &mut y);
        unit_back_substitute_lt_in_place(&self.buf, &mut y);
        let r_norm = norm_inf_slice(&y);
        unit_forward_substitute_in_place(&self.buf, &mut y);
        divide_by_diagonal(&self.buf, &mut y);
        unit_back_substitute_lt_in_place(&self.buf, &mut y);
        let z_norm = norm_inf_slice(&y);

        let mut row = vec![T::zero(); n];
        let m_norm = norm_inf_with(m, &mut row);
        Ok(m_norm * z_norm / r_norm)
    }
}

// ── Solves ──────────────────────────────────────────────────────────

impl<T: FloatScalar> LdltDecomposition<T> {
    /// Solve `M * x = b`.
    pub fn solve<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        self.solve_vector_with(x, b, ldlt_solve)
    }

    /// Solve `M * X = B` column by column.
    pub fn solve_matrix<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        self.solve_columns_with(x, b, ldlt_solve)
    }

    /// Solve into the first `order()` entries of `x` from those of `b`.
    pub fn solve_slice(&self, x: &mut [T], b: &[T]) -> Result<(), LinalgError> {
        let n = self.ready()?;
        if x.len() < n || b.len() < n {
            return Err(LinalgError::SizeMismatch);
        }
        x[..n].copy_from_slice(&b[..n]);
        self.solve_in_place(x)
    }

    /// Overwrite the first `order()` entries of `x` with `M⁻¹ x`.
    pub fn solve_in_place(&self, x: &mut [T]) -> Result<(), LinalgError> {
        let n = self.ready()?;
        if x.len() < n {
            return Err(LinalgError::SizeMismatch);
        }
        ldlt_solve(&self.buf, &mut x[..n]);
        Ok(())
    }

    /// Solve `L * x = b` with the unit lower-triangular factor.
    pub fn solve_l<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: VectorMut<T> + ?Sized,
        B: VectorRef<T> + ?Sized,
    {
        self.solve_vector_with(x, b, |l, s| unit_forward_substitute_in_place(l, s))
    }

    /// Solve `L * X = B` column by column.
    pub fn solve_l_matrix<X, B>(&mut self, x: &mut X, b: &B) -> Result<(), LinalgError>
    where
        X: MatrixMut<T> + ?Sized,
        B: MatrixRef<T> + ?Sized,
    {
        self.solve_columns_with(x, b, |l, s| unit_forward_substitute_in_place(l, s))
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
            ldlt_solve(&self.buf, sol);
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
