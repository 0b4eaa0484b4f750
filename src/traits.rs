use alloc::vec::Vec;
use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by the decompositions (`sqrt`, `abs`, `ln`).
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

// ── Matrix storage contract ─────────────────────────────────────────

/// Read-only access to a matrix-like type.
///
/// This is everything the decompositions need from their input: dimensions,
/// element access and bulk row/column transfer. The bulk methods have default
/// implementations in terms of [`get`](MatrixRef::get); storage types with a
/// contiguous layout may override them.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Copy row `row` into `out[..ncols]`.
    fn row_into(&self, row: usize, out: &mut [T])
    where
        T: Copy,
    {
        for (j, x) in out[..self.ncols()].iter_mut().enumerate() {
            *x = *self.get(row, j);
        }
    }

    /// Copy column `col` into `out[..nrows]`.
    fn col_into(&self, col: usize, out: &mut [T])
    where
        T: Copy,
    {
        for (i, x) in out[..self.nrows()].iter_mut().enumerate() {
            *x = *self.get(i, col);
        }
    }
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with element writes, bulk row/column writes and an
/// optional resize. Fixed-size types keep the defaults for
/// [`is_fixed_size`](MatrixMut::is_fixed_size) and
/// [`set_size`](MatrixMut::set_size).
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Overwrite row `row` with `src[..ncols]`.
    fn set_row(&mut self, row: usize, src: &[T])
    where
        T: Copy,
    {
        let n = self.ncols();
        for (j, &x) in src[..n].iter().enumerate() {
            *self.get_mut(row, j) = x;
        }
    }

    /// Overwrite column `col` with `src[..nrows]`.
    fn set_col(&mut self, col: usize, src: &[T])
    where
        T: Copy,
    {
        let m = self.nrows();
        for (i, &x) in src[..m].iter().enumerate() {
            *self.get_mut(i, col) = x;
        }
    }

    /// Whether the dimensions are fixed.
    fn is_fixed_size(&self) -> bool {
        true
    }

    /// Resize to `nrows x ncols`. Contents afterwards are unspecified.
    ///
    /// Panics for fixed-size types unless the dimensions already match.
    fn set_size(&mut self, nrows: usize, ncols: usize) {
        assert!(
            nrows == self.nrows() && ncols == self.ncols(),
            "cannot resize a fixed-size {}x{} matrix to {}x{}",
            self.nrows(),
            self.ncols(),
            nrows,
            ncols,
        );
    }
}

// ── Vector storage contract ─────────────────────────────────────────

/// Read-only access to a vector-like type.
pub trait VectorRef<T> {
    fn len(&self) -> usize;
    fn get(&self, i: usize) -> &T;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy all elements into `out[..len]`.
    fn copy_to(&self, out: &mut [T])
    where
        T: Copy,
    {
        for (i, x) in out[..self.len()].iter_mut().enumerate() {
            *x = *self.get(i);
        }
    }
}

/// Mutable access to a vector-like type.
pub trait VectorMut<T>: VectorRef<T> {
    fn get_mut(&mut self, i: usize) -> &mut T;

    /// Overwrite all elements from `src[..len]`.
    fn copy_from(&mut self, src: &[T])
    where
        T: Copy,
    {
        let n = self.len();
        for (i, &x) in src[..n].iter().enumerate() {
            *self.get_mut(i) = x;
        }
    }

    fn is_fixed_size(&self) -> bool {
        true
    }

    /// Resize to `n` elements. Contents afterwards are unspecified.
    ///
    /// Panics for fixed-size types unless the length already matches.
    fn set_len(&mut self, n: usize) {
        assert_eq!(n, self.len(), "cannot resize a fixed-size vector");
    }
}

impl<T> VectorRef<T> for [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> &T {
        &self[i]
    }

    fn copy_to(&self, out: &mut [T])
    where
        T: Copy,
    {
        out[..<[T]>::len(self)].copy_from_slice(self);
    }
}

impl<T> VectorMut<T> for [T] {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_from(&mut self, src: &[T])
    where
        T: Copy,
    {
        let n = <[T]>::len(self);
        self.copy_from_slice(&src[..n]);
    }
}

impl<T> VectorRef<T> for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> &T {
        &self[i]
    }
}

impl<T: Scalar> VectorMut<T> for Vec<T> {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn is_fixed_size(&self) -> bool {
        false
    }

    fn set_len(&mut self, n: usize) {
        self.resize(n, T::zero());
    }
}
