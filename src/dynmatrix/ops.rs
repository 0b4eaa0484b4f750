use alloc::vec;
use core::ops::{Mul, Sub};

use crate::traits::Scalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── Matrix multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        for j in 0..p {
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                let a_col = &self.data[k * m..(k + 1) * m];
                let out_col = &mut data[j * m..(j + 1) * m];
                for (o, &a) in out_col.iter_mut().zip(a_col) {
                    *o = *o + a * b_kj;
                }
            }
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

// ── Matrix-vector product ────────────────────────────────────────────

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.ncols,
            rhs.len(),
            "dimension mismatch: {}x{} * {}",
            self.nrows,
            self.ncols,
            rhs.len(),
        );
        let mut out = DynVector::zeros(self.nrows, T::zero());
        for j in 0..self.ncols {
            let x = rhs[j];
            for i in 0..self.nrows {
                out[i] = out[i] + self[(i, j)] * x;
            }
        }
        out
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert!(
            self.nrows == rhs.nrows && self.ncols == rhs.ncols,
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows,
            self.ncols,
            rhs.nrows,
            rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(&a, &b)| a - b)
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}
