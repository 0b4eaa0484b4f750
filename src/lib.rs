//! # spdfact
//!
//! Dense factorizations of symmetric positive-definite matrices, no-std
//! compatible (with `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use spdfact::{CholeskyDecomposition, DynMatrix, DynVector};
//!
//! let m = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
//! let mut chol = CholeskyDecomposition::from_matrix(&m).unwrap();
//!
//! let b = DynVector::from_slice(&[8.0, 7.0]);
//! let mut x = DynVector::zeros(0, 0.0);
//! chol.solve(&mut x, &b).unwrap(); // x = [1.25, 1.5]
//! assert!((x[1] - 1.5).abs() < 1e-12);
//!
//! // grow to 3x3 without refactoring
//! chol.add_row_and_column(&[1.0, 0.5, 5.0][..]).unwrap();
//! assert_eq!(chol.order(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`linalg`]: [`CholeskyDecomposition`] (`M = L·Lᵀ`) and
//!   [`LdltDecomposition`] (`M = L·D·Lᵀ`). Both factor into a reusable internal
//!   buffer and provide solves, determinant, inverse and a condition number
//!   estimate. The Cholesky type can also add or delete a row/column of `M` in
//!   `O(n²)`.
//!
//! - [`matrix`]: Fixed-size `Matrix<T, M, N>` with const-generic dimensions
//!   and the [`Vector<T, N>`] alias. Fixed-size outputs of the wrong shape are
//!   rejected with [`LinalgError::SizeMismatch`].
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` / `DynVector<T>` with
//!   runtime dimensions. Outputs of these types are resized as needed.
//!
//! - [`traits`]: Element traits ([`Scalar`], [`FloatScalar`]) and the storage
//!   contract ([`MatrixRef`], [`MatrixMut`], [`VectorRef`], [`VectorMut`]) the
//!   decompositions read and write through. `[T]` and `Vec<T>` implement the
//!   vector side.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm, `std::error::Error` for [`LinalgError`] |
//! | (none)  | baseline | `no_std` + `alloc`, pure-Rust `libm` float fallback |
//!
//! Diagnostics (rejected pivots, buffer growth) go through the `log` facade.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynVector};
pub use linalg::{CholeskyDecomposition, LdltDecomposition, LinalgError};
pub use matrix::aliases::{
    Matrix2, Matrix2x3, Matrix3, Matrix3x2, Matrix3x4, Matrix4, Matrix4x3, Vector2, Vector3,
    Vector4,
};
pub use matrix::vector::Vector;
pub use matrix::Matrix;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar, VectorMut, VectorRef};
