use crate::traits::FloatScalar;

use super::vector::DynVector;
use super::DynMatrix;

impl<T: FloatScalar> DynMatrix<T> {
    /// Infinity norm: maximum absolute row sum.
    ///
    /// ```
    /// use spdfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert_eq!(m.norm_inf(), 7.0);
    /// ```
    pub fn norm_inf(&self) -> T {
        let mut max = T::zero();
        for i in 0..self.nrows {
            let mut sum = T::zero();
            for j in 0..self.ncols {
                sum = sum + self[(i, j)].abs();
            }
            if sum > max {
                max = sum;
            }
        }
        max
    }

    /// Frobenius norm.
    pub fn norm_fro(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }
}

impl<T: FloatScalar> DynVector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use spdfact::DynVector;
    /// let v = DynVector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norms() {
        let m = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, -4.0, 0.0]);
        assert_eq!(m.norm_inf(), 4.0);
        assert!((m.norm_fro() - 5.0).abs() < 1e-12);
        assert_eq!(m.max_abs(), 4.0);
    }

    #[test]
    fn norm_inf_is_max_row_sum() {
        let m = DynMatrix::from_rows(2, 3, &[1.0_f64, -2.0, 3.0, -4.0, 5.0, -6.0]);
        assert_eq!(m.norm_inf(), 15.0);
    }
}
