mod buffer;
pub(crate) mod cholesky;
mod condition;
pub(crate) mod ldlt;
mod triangular;

pub use cholesky::CholeskyDecomposition;
pub use ldlt::LdltDecomposition;

use crate::traits::{MatrixMut, VectorMut};

/// Errors from the SPD decompositions.
///
/// Every fallible operation on [`CholeskyDecomposition`] and
/// [`LdltDecomposition`] returns one of these. Failed solves and updates
/// leave the decomposition as it was; a factor that hits a bad pivot leaves
/// it empty and uninitialized.
///
/// ```
/// use spdfact::Matrix;
/// use spdfact::linalg::LinalgError;
///
/// let not_pd = Matrix::new([[1.0_f64, 2.0], [2.0, 1.0]]);
/// assert_eq!(not_pd.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// An argument has dimensions incompatible with the decomposition and
    /// cannot be resized (or the matrix to factor is not square).
    SizeMismatch,
    /// A pivot is negative or negligible to working precision.
    NotPositiveDefinite,
    /// The decomposition has not been successfully factored.
    NotInitialized,
    /// A row/column index lies outside `0..size`.
    IndexOutOfRange { index: usize, size: usize },
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::SizeMismatch => write!(f, "incompatible dimensions"),
            LinalgError::NotPositiveDefinite => {
                write!(f, "matrix is not symmetric positive definite")
            }
            LinalgError::NotInitialized => write!(f, "uninitialized decomposition"),
            LinalgError::IndexOutOfRange { index, size } => {
                write!(f, "row/column index {} out of range for size {}", index, size)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Make `m` an `nrows x ncols` matrix, resizing it if it allows that.
pub(crate) fn conform_matrix<T, M>(m: &mut M, nrows: usize, ncols: usize) -> Result<(), LinalgError>
where
    M: MatrixMut<T> + ?Sized,
{
    if m.nrows() == nrows && m.ncols() == ncols {
        Ok(())
    } else if m.is_fixed_size() {
        Err(LinalgError::SizeMismatch)
    } else {
        m.set_size(nrows, ncols);
        Ok(())
    }
}

/// Make `v` an `n`-vector, resizing it if it allows that.
pub(crate) fn conform_vector<T, V>(v: &mut V, n: usize) -> Result<(), LinalgError>
where
    V: VectorMut<T> + ?Sized,
{
    if v.len() == n {
        Ok(())
    } else if v.is_fixed_size() {
        Err(LinalgError::SizeMismatch)
    } else {
        v.set_len(n);
        Ok(())
    }
}
