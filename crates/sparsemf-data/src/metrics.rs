//! Held-out error metrics for a fitted factorization.
//!
//! [`evaluate`] scores the predictions `dot(U[:, i], V[:, j])` on the test
//! entries of a [`TrainingDataset`] and compares them with a baseline that
//! guesses uniformly in `[0, max_rating)`. Errors are also broken down by
//! activity level: the number of training observations left in the row (or
//! column) of each test entry.

use crate::dataset::TrainingDataset;
use crate::error::{DataError, Result};
use rand::Rng;
use sparsemf_core::{MatrixError, SparseMatrix};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Mean absolute and root mean squared error over a group of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ErrorSummary {
    /// Number of entries in the group
    pub count: usize,
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
}

/// Result of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EvaluationReport {
    /// Errors of the factorization on the test set
    pub model: ErrorSummary,
    /// Errors of the uniform random baseline on the test set
    pub random: ErrorSummary,
    /// Model errors grouped by the training activity of the entry's row
    pub by_row_activity: BTreeMap<usize, ErrorSummary>,
    /// Model errors grouped by the training activity of the entry's column
    pub by_column_activity: BTreeMap<usize, ErrorSummary>,
}

#[derive(Debug, Default)]
struct ErrorAccumulator {
    count: usize,
    absolute: f64,
    squared: f64,
}

impl ErrorAccumulator {
    fn push(&mut self, error: f64) {
        self.count += 1;
        self.absolute += error.abs();
        self.squared += error * error;
    }

    fn summary(&self) -> ErrorSummary {
        let n = self.count.max(1) as f64;
        ErrorSummary {
            count: self.count,
            mae: self.absolute / n,
            rmse: (self.squared / n).sqrt(),
        }
    }
}

/// Scores `U`, `V` on the test entries of `dataset`.
///
/// `u` is latent × rows and `v` latent × columns of the dataset matrix.
/// Test entries are visited in `(row, column)` order, so a seeded `rng`
/// makes the random baseline reproducible.
pub fn evaluate<R: Rng + ?Sized>(
    dataset: &TrainingDataset,
    u: &SparseMatrix,
    v: &SparseMatrix,
    rng: &mut R,
) -> Result<EvaluationReport> {
    if dataset.test_entries().is_empty() {
        return Err(DataError::EmptyTestSet);
    }
    let (rows, columns) = dataset.matrix().shape();
    if u.column_dimension() != rows || v.column_dimension() != columns {
        return Err(MatrixError::dimension_mismatch(
            format!("factors covering {rows}x{columns}"),
            format!(
                "factors covering {}x{}",
                u.column_dimension(),
                v.column_dimension()
            ),
        )
        .into());
    }

    let mut entries: Vec<_> = dataset.test_entries().iter().collect();
    entries.sort_by_key(|entry| *entry.0);

    let mut model = ErrorAccumulator::default();
    let mut random = ErrorAccumulator::default();
    let mut by_row: BTreeMap<usize, ErrorAccumulator> = BTreeMap::new();
    let mut by_column: BTreeMap<usize, ErrorAccumulator> = BTreeMap::new();

    for (&(i, j), &observed) in entries {
        let error = observed - SparseMatrix::dot_columns(u, i, v, j)?;
        model.push(error);

        let guess = rng.gen::<f64>() * dataset.max_rating();
        random.push(observed - guess);

        let row_activity = dataset.row_non_zero(i);
        let column_activity = dataset.column_non_zero(j);
        by_row.entry(row_activity).or_default().push(error);
        by_column.entry(column_activity).or_default().push(error);
    }

    Ok(EvaluationReport {
        model: model.summary(),
        random: random.summary(),
        by_row_activity: summarize(&by_row),
        by_column_activity: summarize(&by_column),
    })
}

fn write_breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    groups: &BTreeMap<usize, ErrorSummary>,
) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "activity\tcount\tMAE\tRMSE")?;
    for (activity, summary) in groups {
        writeln!(
            f,
            "{activity}\t{}\t{:.4}\t{:.4}",
            summary.count, summary.mae, summary.rmse
        )?;
    }
    Ok(())
}

fn summarize(groups: &BTreeMap<usize, ErrorAccumulator>) -> BTreeMap<usize, ErrorSummary> {
    groups
        .iter()
        .map(|(&activity, acc)| (activity, acc.summary()))
        .collect()
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_breakdown(f, "Rows by training activity", &self.by_row_activity)?;
        writeln!(f)?;
        write_breakdown(f, "Columns by training activity", &self.by_column_activity)?;
        writeln!(f)?;
        writeln!(f, "Type\tMAE\tRMSE")?;
        writeln!(f, "Model\t{:.4}\t{:.4}", self.model.mae, self.model.rmse)?;
        writeln!(f, "Random\t{:.4}\t{:.4}", self.random.mae, self.random.rmse)
    }
}
