//! Error types for rating data handling.

use sparsemf_core::MatrixError;
use thiserror::Error;

/// Errors raised while loading, splitting or evaluating rating data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The rating source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A non-comment line is not `rowId columnId rating`.
    #[error("Malformed rating on line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// The input contained no observations.
    #[error("No observations found in rating input")]
    NoObservations,

    /// Test and validation percentages must be non-negative and sum to at
    /// most 100.
    #[error("Invalid split: {requested}% requested, at most 100% can be held out")]
    InvalidSplit {
        /// Sum of the requested percentages
        requested: f64,
    },

    /// Evaluation was requested without held-out test entries.
    #[error("Test set is empty")]
    EmptyTestSet,

    /// A row or column identifier was never seen in the input.
    #[error("Unknown identifier: {id}")]
    UnknownIdentifier {
        /// The identifier that was looked up
        id: String,
    },

    /// Propagated sparse matrix error.
    #[error("Matrix operation failed: {0}")]
    Matrix(#[from] MatrixError),
}

impl DataError {
    /// Create a Parse error for the given 1-based line.
    pub fn parse<S: Into<String>>(line: usize, reason: S) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Create an UnknownIdentifier error.
    pub fn unknown_identifier<S: Into<String>>(id: S) -> Self {
        Self::UnknownIdentifier { id: id.into() }
    }
}

/// Result type alias for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
