//! SparseMF Data - Rating datasets and evaluation for matrix factorization.
//!
//! This crate turns a plain-text rating file into the sparse target matrix
//! the optimizer consumes, holds out random test and validation entries,
//! and scores a fitted factorization on the held-out test entries.
//!
//! # Modules
//!
//! - [`dataset`]: Loading and splitting ratings
//! - [`metrics`]: MAE / RMSE against a random baseline
//! - [`error`]: Error types for data handling
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use sparsemf_data::TrainingDataset;
//!
//! let text = "u1 i1 4\nu1 i2 2\nu2 i1 5\nu2 i3 1\n";
//! let mut dataset = TrainingDataset::from_reader(std::io::Cursor::new(text))?;
//! dataset.split(25.0, 0.0, &mut StdRng::seed_from_u64(0))?;
//! assert_eq!(dataset.test_size(), 1);
//! assert_eq!(dataset.training_size(), 3);
//! # Ok::<(), sparsemf_data::DataError>(())
//! ```

pub mod dataset;
pub mod error;
pub mod metrics;

pub use dataset::TrainingDataset;
pub use error::{DataError, Result};
pub use metrics::{evaluate, ErrorSummary, EvaluationReport};
