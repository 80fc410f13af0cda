//! Error types for sparse matrix operations.
//!
//! Every fallible operation of [`SparseMatrix`](crate::SparseMatrix) reports
//! one of these errors before touching its storage, so a failed call never
//! leaves a matrix partially updated.

use std::fmt;
use thiserror::Error;

/// Logical axis of a matrix, used to qualify index errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row axis
    Row,
    /// Column axis
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Errors that can occur during sparse matrix operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// The requested shape cannot be represented.
    ///
    /// Raised for a zero row or column count and when `rows * columns` does
    /// not fit the 64-bit key space used to address entries.
    #[error("Invalid matrix dimensions: {reason}")]
    InvalidDimensions {
        /// Description of why the dimensions are invalid
        reason: String,
    },

    /// Dimension mismatch between operands.
    ///
    /// Raised by element-wise operations on differently shaped matrices and
    /// by products whose inner dimensions disagree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Index outside of the (orientation-adjusted) matrix bounds.
    #[error("{axis} index {index} out of range [0, {bound})")]
    OutOfRange {
        /// Axis the index refers to
        axis: Axis,
        /// Offending index
        index: usize,
        /// Exclusive upper bound of the axis
        bound: usize,
    },

    /// Invalid scalar parameter, such as a fill percentage outside [0, 100].
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the invalid parameter
        reason: String,
    },
}

impl MatrixError {
    /// Create an InvalidDimensions error with a custom reason.
    pub fn invalid_dimensions<S: Into<String>>(reason: S) -> Self {
        Self::InvalidDimensions {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: fmt::Display,
        S2: fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(axis: Axis, index: usize, bound: usize) -> Self {
        Self::OutOfRange { axis, index, bound }
    }

    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce MatrixError.
pub type Result<T> = std::result::Result<T, MatrixError>;
