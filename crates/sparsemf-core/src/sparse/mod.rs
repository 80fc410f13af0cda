//! Open-addressed sparse matrix with an O(1) orientation flag.
//!
//! [`SparseMatrix`] stores its non-zero entries in a hash map keyed by a
//! 64-bit composite key `row * columns + column`, computed against the
//! *physical* (untransposed) layout. The map is a SwissTable, i.e. open
//! addressing with O(1) amortized access, hashed with the fixed-seed Fx
//! hasher so that iteration order (and with it every floating-point
//! reduction) depends only on the sequence of writes.
//!
//! # Orientation
//!
//! Transposing a matrix never moves data: it flips an orientation flag that
//! swaps logical `(row, column)` addressing before the key is computed and
//! swaps the reported dimensions. The entry store sits behind an [`Arc`] and
//! is cloned on the first write to a shared store, so `copy()` and
//! `transpose()` are O(1) while mutating one matrix never affects another.
//!
//! # Invariant
//!
//! No entry is ever stored with a value of exactly `0.0`. Writing zero to a
//! position removes its key, which keeps [`SparseMatrix::non_zero_count`]
//! equal to the size of the support.
//!
//! # Example
//!
//! ```rust
//! use sparsemf_core::SparseMatrix;
//!
//! let mut m = SparseMatrix::new(2, 3)?;
//! m.set_entry(0, 2, 4.0)?;
//!
//! let t = m.transpose();
//! assert_eq!(t.row_dimension(), 3);
//! assert_eq!(t.get_entry(2, 0)?, 4.0);
//! # Ok::<(), sparsemf_core::MatrixError>(())
//! ```

mod ops;
mod random;

use crate::error::{Axis, MatrixError, Result};
use nalgebra::{DMatrix, DVector};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Entry store keyed by physical position.
pub(crate) type EntryMap = FxHashMap<u64, f64>;

/// Storage layout of a [`SparseMatrix`] relative to its entry keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Logical coordinates equal physical coordinates.
    #[default]
    Normal,
    /// Logical `(row, column)` maps to physical `(column, row)`.
    Transposed,
}

impl Orientation {
    /// Returns the opposite orientation.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Normal => Self::Transposed,
            Self::Transposed => Self::Normal,
        }
    }
}

/// Sparse real matrix backed by an open-addressed hash map.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    /// Number of physical rows
    rows: usize,
    /// Number of physical columns
    columns: usize,
    /// Non-zero entries keyed by `row * columns + column` (physical layout)
    entries: Arc<EntryMap>,
    /// How logical coordinates map onto the physical layout
    orientation: Orientation,
}

impl SparseMatrix {
    /// Creates an empty matrix with the given dimensions.
    ///
    /// Fails with [`MatrixError::InvalidDimensions`] if either dimension is
    /// zero or if `rows * columns` overflows the 64-bit key space.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Self::with_entries(rows, columns, EntryMap::default())
    }

    /// Builds a matrix from a dense nalgebra matrix, skipping zeros.
    pub fn from_dense(dense: &DMatrix<f64>) -> Result<Self> {
        let mut entries = EntryMap::default();
        let columns = dense.ncols() as u64;
        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let value = dense[(i, j)];
                if value != 0.0 {
                    entries.insert(i as u64 * columns + j as u64, value);
                }
            }
        }
        Self::with_entries(dense.nrows(), dense.ncols(), entries)
    }

    /// Builds a matrix from row-major data, skipping zeros.
    pub fn from_row_slice(rows: usize, columns: usize, data: &[f64]) -> Result<Self> {
        let expected = rows.checked_mul(columns).ok_or_else(|| {
            MatrixError::invalid_dimensions(format!("{rows}x{columns} overflows usize"))
        })?;
        if data.len() != expected {
            return Err(MatrixError::dimension_mismatch(
                format!("{expected} values for a {rows}x{columns} matrix"),
                format!("{} values", data.len()),
            ));
        }

        let entries = data
            .iter()
            .enumerate()
            .filter(|(_, &value)| value != 0.0)
            .map(|(index, &value)| (index as u64, value))
            .collect();
        Self::with_entries(rows, columns, entries)
    }

    pub(crate) fn with_entries(rows: usize, columns: usize, entries: EntryMap) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(MatrixError::invalid_dimensions(format!(
                "{rows}x{columns} has an empty axis"
            )));
        }
        if (rows as u64).checked_mul(columns as u64).is_none() {
            return Err(MatrixError::invalid_dimensions(format!(
                "{rows}x{columns} exceeds the 64-bit key space"
            )));
        }
        Ok(Self {
            rows,
            columns,
            entries: Arc::new(entries),
            orientation: Orientation::Normal,
        })
    }

    /// Number of logical rows.
    #[inline]
    pub fn row_dimension(&self) -> usize {
        match self.orientation {
            Orientation::Normal => self.rows,
            Orientation::Transposed => self.columns,
        }
    }

    /// Number of logical columns.
    #[inline]
    pub fn column_dimension(&self) -> usize {
        match self.orientation {
            Orientation::Normal => self.columns,
            Orientation::Transposed => self.rows,
        }
    }

    /// Logical shape as `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_dimension(), self.column_dimension())
    }

    /// Current orientation of the matrix.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns `true` if logical addressing is swapped.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.orientation == Orientation::Transposed
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn non_zero_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns an independent copy of this matrix.
    ///
    /// The entry store is shared until either side is written to.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns the transpose of this matrix in O(1).
    pub fn transpose(&self) -> Self {
        let mut out = self.clone();
        out.orientation = self.orientation.flipped();
        out
    }

    /// Returns the value at `(row, column)`, or `0.0` if it is not stored.
    pub fn get_entry(&self, row: usize, column: usize) -> Result<f64> {
        self.check_index(row, column)?;
        Ok(self.value_at(row, column))
    }

    /// Stores `value` at `(row, column)`; a value of exactly `0.0` removes the entry.
    pub fn set_entry(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        self.check_index(row, column)?;
        let key = self.key(row, column);
        self.store(key, value);
        Ok(())
    }

    /// Adds `increment` to the value at `(row, column)`.
    pub fn add_to_entry(&mut self, row: usize, column: usize, increment: f64) -> Result<()> {
        self.check_index(row, column)?;
        let key = self.key(row, column);
        let value = self.entries.get(&key).copied().unwrap_or(0.0) + increment;
        self.store(key, value);
        Ok(())
    }

    /// Multiplies the value at `(row, column)` by `factor`.
    pub fn multiply_entry(&mut self, row: usize, column: usize, factor: f64) -> Result<()> {
        self.check_index(row, column)?;
        let key = self.key(row, column);
        let value = self.entries.get(&key).copied().unwrap_or(0.0) * factor;
        self.store(key, value);
        Ok(())
    }

    /// Returns `true` if a non-zero value is stored at `(row, column)`.
    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.row_dimension()
            && column < self.column_dimension()
            && self.entries.contains_key(&self.key(row, column))
    }

    /// Iterates over stored entries as `(row, column, value)` in logical coordinates.
    ///
    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.entries.iter().map(move |(&key, &value)| {
            let (row, column) = self.logical(key);
            (row, column, value)
        })
    }

    /// Extracts logical row `row` as a dense vector.
    pub fn row_vector(&self, row: usize) -> Result<DVector<f64>> {
        if row >= self.row_dimension() {
            return Err(MatrixError::out_of_range(Axis::Row, row, self.row_dimension()));
        }
        Ok(DVector::from_fn(self.column_dimension(), |j, _| {
            self.value_at(row, j)
        }))
    }

    /// Extracts logical column `column` as a dense vector.
    pub fn column_vector(&self, column: usize) -> Result<DVector<f64>> {
        if column >= self.column_dimension() {
            return Err(MatrixError::out_of_range(Axis::Column, column, self.column_dimension()));
        }
        Ok(DVector::from_fn(self.row_dimension(), |i, _| {
            self.value_at(i, column)
        }))
    }

    /// Dot product of column `i` of `a` with column `j` of `b`.
    ///
    /// This is the prediction `dot(U[:, i], V[:, j])` for latent factor
    /// matrices stored latent-major; both operands must have the same
    /// number of rows.
    pub fn dot_columns(a: &Self, i: usize, b: &Self, j: usize) -> Result<f64> {
        if a.row_dimension() != b.row_dimension() {
            return Err(MatrixError::dimension_mismatch(
                format!("{} rows", a.row_dimension()),
                format!("{} rows", b.row_dimension()),
            ));
        }
        if i >= a.column_dimension() {
            return Err(MatrixError::out_of_range(Axis::Column, i, a.column_dimension()));
        }
        if j >= b.column_dimension() {
            return Err(MatrixError::out_of_range(Axis::Column, j, b.column_dimension()));
        }
        Ok((0..a.row_dimension())
            .map(|k| a.value_at(k, i) * b.value_at(k, j))
            .sum())
    }

    /// Converts to a dense nalgebra matrix in logical orientation.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.row_dimension(), self.column_dimension());
        for (i, j, value) in self.iter() {
            dense[(i, j)] = value;
        }
        dense
    }

    /// Checks that `(row, column)` lies inside the logical bounds.
    fn check_index(&self, row: usize, column: usize) -> Result<()> {
        if row >= self.row_dimension() {
            return Err(MatrixError::out_of_range(Axis::Row, row, self.row_dimension()));
        }
        if column >= self.column_dimension() {
            return Err(MatrixError::out_of_range(Axis::Column, column, self.column_dimension()));
        }
        Ok(())
    }

    /// Physical key of logical `(row, column)`.
    #[inline]
    pub(crate) fn key(&self, row: usize, column: usize) -> u64 {
        let (row, column) = match self.orientation {
            Orientation::Normal => (row, column),
            Orientation::Transposed => (column, row),
        };
        row as u64 * self.columns as u64 + column as u64
    }

    /// Logical `(row, column)` of a physical key.
    #[inline]
    pub(crate) fn logical(&self, key: u64) -> (usize, usize) {
        let columns = self.columns as u64;
        let (row, column) = ((key / columns) as usize, (key % columns) as usize);
        match self.orientation {
            Orientation::Normal => (row, column),
            Orientation::Transposed => (column, row),
        }
    }

    /// Unchecked read used by the kernels; callers guarantee the bounds.
    #[inline]
    pub(crate) fn value_at(&self, row: usize, column: usize) -> f64 {
        self.entries
            .get(&self.key(row, column))
            .copied()
            .unwrap_or(0.0)
    }

    /// Writes a value under a physical key, honoring the zero-removal rule.
    #[inline]
    pub(crate) fn store(&mut self, key: u64, value: f64) {
        let entries = Arc::make_mut(&mut self.entries);
        if value == 0.0 {
            entries.remove(&key);
        } else {
            entries.insert(key, value);
        }
    }
}

impl PartialEq for SparseMatrix {
    /// Two matrices are equal when their logical shapes and values agree,
    /// regardless of orientation or storage sharing.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.non_zero_count() == other.non_zero_count()
            && self
                .iter()
                .all(|(i, j, value)| other.value_at(i, j) == value)
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.row_dimension() {
            for j in 0..self.column_dimension() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:.2}", self.value_at(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
