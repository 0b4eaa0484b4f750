use crate::traits::{FloatScalar, MatrixRef};

// In-place triangular solves on the lower triangle of a square matrix.
// Only `l[i][j]` with `i >= j` is read; `x` must hold at least `l.nrows()`
// entries and is overwritten with the solution.

/// Solve `L * x = b`, `L` lower triangular.
#[inline]
pub(crate) fn forward_substitute_in_place<T: FloatScalar>(
    l: &(impl MatrixRef<T> + ?Sized),
    x: &mut [T],
) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = x[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve `L^T * x = b`, `L` lower triangular.
///
/// Also solves the row problem `x * L = b`.
#[inline]
pub(crate) fn back_substitute_lt_in_place<T: FloatScalar>(
    l: &(impl MatrixRef<T> + ?Sized),
    x: &mut [T],
) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve `L * x = b` with an implicit unit diagonal.
#[inline]
pub(crate) fn unit_forward_substitute_in_place<T: FloatScalar>(
    l: &(impl MatrixRef<T> + ?Sized),
    x: &mut [T],
) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = x[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum;
    }
}

/// Solve `L^T * x = b` with an implicit unit diagonal.
#[inline]
pub(crate) fn unit_back_substitute_lt_in_place<T: FloatScalar>(
    l: &(impl MatrixRef<T> + ?Sized),
    x: &mut [T],
) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum;
    }
}

/// `x[i] /= m[i][i]`.
#[inline]
pub(crate) fn divide_by_diagonal<T: FloatScalar>(m: &(impl MatrixRef<T> + ?Sized), x: &mut [T]) {
    for (i, xi) in x[..m.nrows()].iter_mut().enumerate() {
        *xi = *xi / *m.get(i, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;

    fn l3() -> Matrix<f64, 3, 3> {
        Matrix::new([[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]])
    }

    #[test]
    fn forward_and_back() {
        let l = l3();
        // L * [1, 2, 3] = [2, 8, 11]
        let mut x = [2.0, 8.0, 11.0];
        forward_substitute_in_place(&l, &mut x);
        for (a, b) in x.iter().zip(&[1.0, 2.0, 3.0]) {
            assert!((a - b).abs() < 1e-12, "forward: {} vs {}", a, b);
        }

        // L^T * [1, 2, 3] = [2 + 12 - 24, 1 + 15, 9] = [-10, 17, 9]
        let mut y = [-10.0, 17.0, 9.0];
        back_substitute_lt_in_place(&l, &mut y);
        for (a, b) in y.iter().zip(&[1.0, 2.0, 3.0]) {
            assert!((a - b).abs() < 1e-12, "back: {} vs {}", a, b);
        }
    }

    #[test]
    fn unit_diagonal_ignores_stored_diagonal() {
        let l = l3();
        // unit L * [1, 1, 1] = [1, 7, -2]
        let mut x = [1.0, 7.0, -2.0];
        unit_forward_substitute_in_place(&l, &mut x);
        assert_eq!(x, [1.0, 1.0, 1.0]);

        // unit L^T * [1, 1, 1] = [1 + 6 - 8, 1 + 5, 1] = [-1, 6, 1]
        let mut y = [-1.0, 6.0, 1.0];
        unit_back_substitute_lt_in_place(&l, &mut y);
        assert_eq!(y, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn diagonal_scaling() {
        let l = l3();
        let mut x = [4.0, 1.0, 9.0];
        divide_by_diagonal(&l, &mut x);
        assert_eq!(x, [2.0, 1.0, 3.0]);
    }
}
