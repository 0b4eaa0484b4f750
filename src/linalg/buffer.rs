use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{MatrixRef, Scalar};

/// Row-major `w x w` storage holding an `n x n` working matrix, `n <= w`.
///
/// Element `(i, j)` lives at `data[i * w + j]`. Growing the width keeps the
/// leading `n x n` block; everything outside it is scratch.
#[derive(Debug, Clone)]
pub(crate) struct DenseBuffer<T> {
    data: Vec<T>,
    n: usize,
    w: usize,
}

impl<T: Scalar> DenseBuffer<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            n: 0,
            w: 0,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: vec![T::zero(); cap * cap],
            n: 0,
            w: cap,
        }
    }

    /// Grow the width to at least `cap`. Returns `true` if storage was
    /// reallocated.
    pub fn ensure_capacity(&mut self, cap: usize) -> bool {
        if cap <= self.w {
            return false;
        }
        let old_w = self.w;
        let new_w = cap.max(old_w + old_w / 2);
        let mut data = vec![T::zero(); new_w * new_w];
        for i in 0..self.n {
            data[i * new_w..i * new_w + self.n]
                .copy_from_slice(&self.data[i * old_w..i * old_w + self.n]);
        }
        self.data = data;
        self.w = new_w;
        log::trace!("dense buffer grown from width {} to {}", old_w, new_w);
        true
    }

    /// Set the logical order, growing first if needed. Elements exposed by a
    /// larger order hold whatever the scratch area contained.
    pub fn set_order(&mut self, n: usize) {
        self.ensure_capacity(n);
        self.n = n;
    }

    /// Copy a square matrix into the leading block and make it the working
    /// matrix.
    pub fn load(&mut self, m: &(impl MatrixRef<T> + ?Sized)) {
        let n = m.nrows();
        self.ensure_capacity(n);
        let w = self.w;
        for i in 0..n {
            m.row_into(i, &mut self.data[i * w..(i + 1) * w]);
        }
        self.n = n;
    }

    /// Leading `len` entries of row `i`.
    #[inline]
    pub fn row(&self, i: usize, len: usize) -> &[T] {
        &self.data[i * self.w..i * self.w + len]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize, len: usize) -> &mut [T] {
        &mut self.data[i * self.w..i * self.w + len]
    }
}

impl<T> DenseBuffer<T> {
    #[inline]
    pub fn order(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<(usize, usize)> for DenseBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.w + j]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseBuffer<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.w + j]
    }
}

/// The working `n x n` block, read through the storage contract.
impl<T> MatrixRef<T> for DenseBuffer<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.n
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.n
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.w + col]
    }

    fn row_into(&self, row: usize, out: &mut [T])
    where
        T: Copy,
    {
        let start = row * self.w;
        out[..self.n].copy_from_slice(&self.data[start..start + self.n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynMatrix;

    #[test]
    fn load_sets_order_and_layout() {
        let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut buf = DenseBuffer::new();
        buf.load(&m);
        assert_eq!(buf.order(), 2);
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buf[(1, 0)], 3.0);
    }

    #[test]
    fn growth_preserves_block() {
        let m = DynMatrix::from_fn(3, 3, |i, j| (10 * i + j) as f64);
        let mut buf = DenseBuffer::with_capacity(3);
        buf.load(&m);
        assert!(buf.ensure_capacity(4));
        // 1.5x policy: max(4, 3 + 1)
        assert_eq!(buf.width(), 4);
        assert!(buf.ensure_capacity(5));
        assert_eq!(buf.width(), 6);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(buf[(i, j)], (10 * i + j) as f64);
            }
        }
        assert_eq!(buf.row(2, 3), &[20.0, 21.0, 22.0]);
    }

    #[test]
    fn no_shrink() {
        let mut buf: DenseBuffer<f64> = DenseBuffer::with_capacity(8);
        assert!(!buf.ensure_capacity(3));
        buf.set_order(2);
        assert_eq!(buf.width(), 8);
        assert_eq!(buf.order(), 2);
    }

    #[test]
    fn contract_view_is_working_block() {
        let mut buf: DenseBuffer<f64> = DenseBuffer::with_capacity(4);
        buf.set_order(2);
        buf.row_mut(1, 2).copy_from_slice(&[5.0, 6.0]);
        assert_eq!(buf.nrows(), 2);
        assert_eq!(*buf.get(1, 1), 6.0);
        let mut row = [0.0; 2];
        buf.row_into(1, &mut row);
        assert_eq!(row, [5.0, 6.0]);
    }
}
