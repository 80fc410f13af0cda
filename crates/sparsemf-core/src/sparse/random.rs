//! Random matrix generation.
//!
//! Both generators take the random source explicitly so callers decide
//! between a seeded `StdRng` for reproducible runs and `thread_rng()`.

use super::{EntryMap, SparseMatrix};
use crate::error::{MatrixError, Result};
use rand::Rng;

/// Draws from `[0, 1)` excluding exactly zero, which could not be stored.
fn non_zero_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let value: f64 = rng.gen();
        if value != 0.0 {
            return value;
        }
    }
}

impl SparseMatrix {
    /// Fills every position with a uniform random value in `(0, 1)`.
    ///
    /// Cost and memory are O(rows × columns); meant for latent factor
    /// matrices, not for rating-sized targets.
    pub fn random_dense<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Result<Self> {
        let mut m = Self::new(rows, columns)?;
        let mut entries =
            EntryMap::with_capacity_and_hasher(rows.saturating_mul(columns), Default::default());
        for i in 0..rows {
            for j in 0..columns {
                entries.insert(m.key(i, j), non_zero_unit(rng));
            }
        }
        m.entries = entries.into();
        Ok(m)
    }

    /// Fills `floor(rows * columns * percent / 100)` distinct random
    /// positions with uniform random values.
    ///
    /// Positions are drawn uniformly and collisions are rejected, so the
    /// expected number of draws grows sharply as `percent` approaches 100.
    /// Use it for small to moderate fill fractions.
    pub fn random_sparse<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        percent: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(MatrixError::invalid_parameter(format!(
                "fill percentage must lie in [0, 100], got {percent}"
            )));
        }

        let mut m = Self::new(rows, columns)?;
        let target = (rows as f64 * columns as f64 * percent / 100.0) as usize;
        let mut entries = EntryMap::with_capacity_and_hasher(target, Default::default());
        while entries.len() < target {
            let row = rng.gen_range(0..rows);
            let column = rng.gen_range(0..columns);
            let key = m.key(row, column);
            if entries.contains_key(&key) {
                continue;
            }
            entries.insert(key, non_zero_unit(rng));
        }
        m.entries = entries.into();
        Ok(m)
    }
}
