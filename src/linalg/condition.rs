//! Pieces of the LINPACK-style condition estimator
//! (Golub & Van Loan, *Matrix Computations*, §3.5.4).

use alloc::vec;
use alloc::vec::Vec;

use crate::traits::{FloatScalar, MatrixRef};

/// Build the right-hand side `y` of `L * y = d` where each `d[j]` is `±1`,
/// chosen greedily column by column to make the partial solution large.
///
/// With `unit_diagonal` the stored diagonal of `l` is ignored and taken as 1.
pub(crate) fn greedy_rhs<T: FloatScalar>(
    l: &(impl MatrixRef<T> + ?Sized),
    unit_diagonal: bool,
) -> Vec<T> {
    let n = l.nrows();
    let one = T::one();
    let mut y = vec![T::zero(); n];
    let mut p = vec![T::zero(); n];
    let mut ppos = vec![T::zero(); n];
    let mut pneg = vec![T::zero(); n];

    for j in 0..n {
        let diag = if unit_diagonal { one } else { *l.get(j, j) };
        let ypos = (one - p[j]) / diag;
        let yneg = (-one - p[j]) / diag;

        let mut pos_norm1 = T::zero();
        let mut neg_norm1 = T::zero();
        for i in (j + 1)..n {
            let lij = *l.get(i, j);
            ppos[i] = p[i] + ypos * lij;
            pneg[i] = p[i] + yneg * lij;
            pos_norm1 = pos_norm1 + ppos[i].abs();
            neg_norm1 = neg_norm1 + pneg[i].abs();
        }

        if ypos.abs() + pos_norm1 >= yneg.abs() + neg_norm1 {
            y[j] = ypos;
            p[(j + 1)..n].copy_from_slice(&ppos[(j + 1)..n]);
        } else {
            y[j] = yneg;
            p[(j + 1)..n].copy_from_slice(&pneg[(j + 1)..n]);
        }
    }
    y
}

/// Largest absolute entry.
pub(crate) fn norm_inf_slice<T: FloatScalar>(x: &[T]) -> T {
    x.iter()
        .fold(T::zero(), |acc, &v| if v.abs() > acc { v.abs() } else { acc })
}

/// Infinity norm (max absolute row sum) of any matrix, using `row` as scratch.
///
/// `row` must hold at least `m.ncols()` entries.
pub(crate) fn norm_inf_with<T: FloatScalar>(
    m: &(impl MatrixRef<T> + ?Sized),
    row: &mut [T],
) -> T {
    let ncols = m.ncols();
    let mut max = T::zero();
    for i in 0..m.nrows() {
        m.row_into(i, row);
        let sum = row[..ncols].iter().fold(T::zero(), |acc, &x| acc + x.abs());
        if sum > max {
            max = sum;
        }
    }
    max
}
