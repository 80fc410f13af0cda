//! Arithmetic kernels over [`SparseMatrix`].
//!
//! All kernels iterate stored entries only. Element-wise operations cost
//! O(nnz) of the right operand, the product costs O(nnz(left) × columns(right))
//! and the support-restricted residual costs O(nnz(R) × latent), independent
//! of the dense size of the matrices involved.

use super::{EntryMap, SparseMatrix};
use crate::error::{MatrixError, Result};
use std::sync::Arc;

impl SparseMatrix {
    /// Returns `self + other`.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        let mut out = self.copy();
        for (i, j, value) in other.iter() {
            let key = out.key(i, j);
            let sum = out.value_at(i, j) + value;
            out.store(key, sum);
        }
        Ok(out)
    }

    /// Returns `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        let mut out = self.copy();
        for (i, j, value) in other.iter() {
            let key = out.key(i, j);
            let difference = out.value_at(i, j) - value;
            out.store(key, difference);
        }
        Ok(out)
    }

    /// Returns `factor * self`, keeping the orientation.
    pub fn scalar_multiply(&self, factor: f64) -> Self {
        let entries: EntryMap = self
            .entries
            .iter()
            .filter_map(|(&key, &value)| {
                let scaled = value * factor;
                (scaled != 0.0).then_some((key, scaled))
            })
            .collect();
        Self {
            rows: self.rows,
            columns: self.columns,
            entries: Arc::new(entries),
            orientation: self.orientation,
        }
    }

    /// Returns the product `self * other`.
    ///
    /// For each stored `(i, k)` of `self` and each output column `j`, the
    /// term contributes only if `other` stores a value at `(k, j)`. The cost
    /// degrades toward dense when `other` is dense-ish, which is the case for
    /// the latent factor matrices this is used with; their column count is
    /// the latent dimension.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.column_dimension() != other.row_dimension() {
            return Err(MatrixError::dimension_mismatch(
                format!("{} rows in right operand", self.column_dimension()),
                format!("{} rows", other.row_dimension()),
            ));
        }

        let out_rows = self.row_dimension();
        let out_columns = other.column_dimension();
        let mut accumulator = EntryMap::default();
        for (i, k, value) in self.iter() {
            for j in 0..out_columns {
                if let Some(&right) = other.entries.get(&other.key(k, j)) {
                    *accumulator
                        .entry(i as u64 * out_columns as u64 + j as u64)
                        .or_insert(0.0) += value * right;
                }
            }
        }
        accumulator.retain(|_, value| *value != 0.0);

        Self::with_entries(out_rows, out_columns, accumulator)
    }

    /// Frobenius norm `sqrt(sum of squared entries)`.
    pub fn frobenius_norm(&self) -> f64 {
        self.frobenius_norm_squared().sqrt()
    }

    /// Squared Frobenius norm, without the square root round trip.
    pub fn frobenius_norm_squared(&self) -> f64 {
        self.entries.values().map(|value| value * value).sum()
    }

    /// Residual `R - A * B` evaluated only on the support of `self`.
    ///
    /// `self` is the target `R` (rows × columns), `a` is rows × latent (the
    /// transposed user factors `Uᵗ`) and `b` is latent × columns (the item
    /// factors `V`). For every stored `(i, j)` of `R` the result holds
    /// `R[i, j] - dot(a[i, :], b[:, j])`; every other position is absent.
    /// The dense product `A * B` is never formed.
    pub fn residual_over_support(&self, a: &Self, b: &Self) -> Result<Self> {
        if a.column_dimension() != b.row_dimension() {
            return Err(MatrixError::dimension_mismatch(
                format!("{} latent rows", a.column_dimension()),
                format!("{} latent rows", b.row_dimension()),
            ));
        }
        if (a.row_dimension(), b.column_dimension()) != self.shape() {
            return Err(MatrixError::dimension_mismatch(
                format!("{}x{}", self.row_dimension(), self.column_dimension()),
                format!("{}x{}", a.row_dimension(), b.column_dimension()),
            ));
        }

        let latent = a.column_dimension();
        let entries: EntryMap = self
            .entries
            .iter()
            .filter_map(|(&key, &observed)| {
                let (i, j) = self.logical(key);
                let predicted: f64 = (0..latent)
                    .map(|k| a.value_at(i, k) * b.value_at(k, j))
                    .sum();
                let residual = observed - predicted;
                (residual != 0.0).then_some((key, residual))
            })
            .collect();

        Ok(Self {
            rows: self.rows,
            columns: self.columns,
            entries: Arc::new(entries),
            orientation: self.orientation,
        })
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MatrixError::dimension_mismatch(
                format!("{}x{}", self.row_dimension(), self.column_dimension()),
                format!("{}x{}", other.row_dimension(), other.column_dimension()),
            ));
        }
        Ok(())
    }
}
