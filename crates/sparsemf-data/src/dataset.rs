//! Rating datasets loaded from whitespace-separated text.
//!
//! A rating file holds one observation per line:
//!
//! ```text
//! # user item rating
//! alice  matrix   5
//! alice  alien    3.5
//! bob    matrix   4
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Identifiers are
//! arbitrary strings; rows and columns receive dense indices in order of
//! first appearance. Tokens after the rating are ignored.
//!
//! [`TrainingDataset`] owns the training matrix together with the
//! identifier maps, the held-out test and validation entries, and per-row
//! and per-column counts of the observations left for training.

use crate::error::{DataError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use sparsemf_core::SparseMatrix;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Bidirectional map between identifiers and dense indices.
#[derive(Debug, Clone, Default)]
struct IdentifierMap {
    indices: HashMap<String, usize>,
    names: Vec<String>,
}

impl IdentifierMap {
    fn index_or_insert(&mut self, id: &str) -> usize {
        if let Some(&index) = self.indices.get(id) {
            return index;
        }
        let index = self.names.len();
        self.indices.insert(id.to_owned(), index);
        self.names.push(id.to_owned());
        index
    }

    fn index(&self, id: &str) -> Option<usize> {
        self.indices.get(id).copied()
    }

    fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// A parsed observation, indices already assigned.
struct Observation {
    row: usize,
    column: usize,
    rating: f64,
}

/// Rating matrix with its identifier maps and held-out partitions.
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    matrix: SparseMatrix,
    rows: IdentifierMap,
    columns: IdentifierMap,
    test_entries: HashMap<(usize, usize), f64>,
    validation_entries: HashMap<(usize, usize), f64>,
    row_non_zero: Vec<usize>,
    column_non_zero: Vec<usize>,
    max_rating: f64,
}

impl TrainingDataset {
    /// Loads a rating file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads ratings from any buffered reader.
    ///
    /// The first pass parses every line and assigns indices; the matrix is
    /// then sized from the distinct identifier counts and filled. Repeated
    /// `(row, column)` pairs keep the last rating; a rating of `0.0` leaves
    /// the position unobserved.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = IdentifierMap::default();
        let mut columns = IdentifierMap::default();
        let mut observations = Vec::new();
        let mut max_rating = 0.0_f64;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(row_id), Some(column_id), Some(rating)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(DataError::parse(number + 1, "expected `rowId columnId rating`"));
            };
            let rating: f64 = rating.parse().map_err(|err| {
                DataError::parse(number + 1, format!("invalid rating {rating:?}: {err}"))
            })?;
            if !rating.is_finite() {
                return Err(DataError::parse(number + 1, "rating must be finite"));
            }

            max_rating = max_rating.max(rating);
            observations.push(Observation {
                row: rows.index_or_insert(row_id),
                column: columns.index_or_insert(column_id),
                rating,
            });
        }

        if observations.is_empty() {
            return Err(DataError::NoObservations);
        }

        let mut matrix = SparseMatrix::new(rows.len(), columns.len())?;
        for observation in &observations {
            matrix.set_entry(observation.row, observation.column, observation.rating)?;
        }

        let mut row_non_zero = vec![0; rows.len()];
        let mut column_non_zero = vec![0; columns.len()];
        for (i, j, _) in matrix.iter() {
            row_non_zero[i] += 1;
            column_non_zero[j] += 1;
        }

        Ok(Self {
            matrix,
            rows,
            columns,
            test_entries: HashMap::new(),
            validation_entries: HashMap::new(),
            row_non_zero,
            column_non_zero,
            max_rating,
        })
    }

    /// Moves random training entries into the test and validation sets.
    ///
    /// `floor(n · test_percent / 100)` entries go to the test set and
    /// `floor(n · validation_percent / 100)` to the validation set, where
    /// `n` is the training size before the call. Per-row and per-column
    /// counts are updated accordingly. An invalid request leaves the
    /// dataset untouched.
    pub fn split<R: Rng + ?Sized>(
        &mut self,
        test_percent: f64,
        validation_percent: f64,
        rng: &mut R,
    ) -> Result<()> {
        let requested = test_percent + validation_percent;
        if !(test_percent >= 0.0 && validation_percent >= 0.0 && requested <= 100.0) {
            warn!(test_percent, validation_percent, "rejecting dataset split");
            return Err(DataError::InvalidSplit { requested });
        }

        let initial = self.matrix.non_zero_count();
        let test_count = (initial as f64 * test_percent / 100.0) as usize;
        let validation_count = (initial as f64 * validation_percent / 100.0) as usize;

        let mut entries: Vec<_> = self.matrix.iter().collect();
        entries.sort_by_key(|&(i, j, _)| (i, j));
        entries.shuffle(rng);

        let held_out = test_count + validation_count;
        for (n, &(i, j, rating)) in entries.iter().take(held_out).enumerate() {
            self.matrix.set_entry(i, j, 0.0)?;
            self.row_non_zero[i] -= 1;
            self.column_non_zero[j] -= 1;
            if n < test_count {
                self.test_entries.insert((i, j), rating);
            } else {
                self.validation_entries.insert((i, j), rating);
            }
        }

        info!(
            initial,
            training = self.training_size(),
            test = self.test_size(),
            validation = self.validation_size(),
            "dataset split"
        );
        Ok(())
    }

    /// Training matrix (users × items).
    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    /// Consumes the dataset, keeping only the training matrix.
    pub fn into_matrix(self) -> SparseMatrix {
        self.matrix
    }

    /// Dense index assigned to a row identifier.
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.rows.index(id)
    }

    /// Dense index assigned to a column identifier.
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.index(id)
    }

    /// Identifier behind a row index.
    pub fn row_id(&self, index: usize) -> Option<&str> {
        self.rows.name(index)
    }

    /// Identifier behind a column index.
    pub fn column_id(&self, index: usize) -> Option<&str> {
        self.columns.name(index)
    }

    /// Training rating stored for a pair of identifiers, `0.0` when the
    /// pair is unobserved or held out.
    pub fn rating(&self, row_id: &str, column_id: &str) -> Result<f64> {
        let i = self
            .row_index(row_id)
            .ok_or_else(|| DataError::unknown_identifier(row_id))?;
        let j = self
            .column_index(column_id)
            .ok_or_else(|| DataError::unknown_identifier(column_id))?;
        Ok(self.matrix.get_entry(i, j)?)
    }

    /// Held-out test entries keyed by `(row, column)`.
    pub fn test_entries(&self) -> &HashMap<(usize, usize), f64> {
        &self.test_entries
    }

    /// Held-out validation entries keyed by `(row, column)`.
    pub fn validation_entries(&self) -> &HashMap<(usize, usize), f64> {
        &self.validation_entries
    }

    /// Training observations left in row `index`.
    pub fn row_non_zero(&self, index: usize) -> usize {
        self.row_non_zero.get(index).copied().unwrap_or(0)
    }

    /// Training observations left in column `index`.
    pub fn column_non_zero(&self, index: usize) -> usize {
        self.column_non_zero.get(index).copied().unwrap_or(0)
    }

    /// Largest rating in the input, or `0.0` if all ratings are negative.
    pub fn max_rating(&self) -> f64 {
        self.max_rating
    }

    /// Ratings left in the training matrix.
    pub fn training_size(&self) -> usize {
        self.matrix.non_zero_count()
    }

    /// Ratings held out for testing.
    pub fn test_size(&self) -> usize {
        self.test_entries.len()
    }

    /// Ratings held out for validation.
    pub fn validation_size(&self) -> usize {
        self.validation_entries.len()
    }
}
