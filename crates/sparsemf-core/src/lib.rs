//! Sparse matrix engine for low-rank matrix factorization.
//!
//! This crate provides the sparse algebra that the factorization optimizer
//! is built on: an open-addressed sparse matrix with O(1) transposition,
//! element-wise arithmetic, a sparse product, and a residual kernel that is
//! evaluated only on the observed support of a rating matrix.
//!
//! # Key Concepts
//!
//! - **Support (Ω)**: the set of positions where a matrix stores a value.
//!   No value of exactly `0.0` is ever stored.
//! - **Orientation**: a flag that swaps logical addressing; transposing
//!   never moves entries.
//! - **Support-restricted residual**: `R - UᵗV` computed only on Ω(R),
//!   never materialized densely.
//!
//! # Modules
//!
//! - [`error`]: Error types for matrix operations
//! - [`sparse`]: The [`SparseMatrix`] container and its kernels

pub mod error;
pub mod sparse;

// Re-export commonly used items at the crate root
pub use error::{Axis, MatrixError, Result};
pub use sparse::{Orientation, SparseMatrix};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use sparsemf_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Axis, MatrixError, Result};
    pub use crate::sparse::{Orientation, SparseMatrix};
}
