use core::ops::{Mul, Sub};

use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize> Sub for Matrix<T, M, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..M {
            for j in 0..N {
                out[(i, j)] = self[(i, j)] - rhs[(i, j)];
            }
        }
        out
    }
}

// ── Matrix multiplication ───────────────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let mut out = Matrix::<T, M, P>::zeros();
        for j in 0..P {
            for k in 0..N {
                let b_kj = rhs[(k, j)];
                for i in 0..M {
                    out[(i, j)] = out[(i, j)] + self[(i, k)] * b_kj;
                }
            }
        }
        out
    }
}

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<&Matrix<T, N, P>>
    for &Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;
    fn mul(self, rhs: &Matrix<T, N, P>) -> Matrix<T, M, P> {
        (*self).mul(*rhs)
    }
}

// ── Transpose ───────────────────────────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Transpose: (M×N) → (N×M).
    pub fn transpose(&self) -> Matrix<T, N, M> {
        let mut out = Matrix::<T, N, M>::zeros();
        for i in 0..M {
            for j in 0..N {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }
}
