//! Pre-defined type aliases for the small matrix and vector sizes.

use crate::Matrix;

pub use crate::matrix::vector::{Vector2, Vector3, Vector4};

// ── Square matrix aliases ──────────────────────────────────────────

/// 2×2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// 3×3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// 4×4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;

// ── Rectangular matrix aliases ─────────────────────────────────────

/// 2×3 matrix.
pub type Matrix2x3<T> = Matrix<T, 2, 3>;
/// 3×2 matrix.
pub type Matrix3x2<T> = Matrix<T, 3, 2>;
/// 3×4 matrix.
pub type Matrix3x4<T> = Matrix<T, 3, 4>;
/// 4×3 matrix.
pub type Matrix4x3<T> = Matrix<T, 4, 3>;
