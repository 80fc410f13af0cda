//! A point of the factorization search space.
//!
//! [`FactorizationState`] bundles the latent factors `U` (latent × users)
//! and `V` (latent × items) with the cost `J` last evaluated at them. The
//! optimizer owns two of these, the working point and the best point found
//! so far, and moves values between them with
//! [`FactorizationState::copy_into`].

use crate::error::{OptimizerError, OptimizerResult};
use nalgebra::DMatrix;
use rand::Rng;
use sparsemf_core::SparseMatrix;

/// Scale applied to the uniform random initial factors.
const INITIAL_SCALE: f64 = 0.1;

/// Latent factors `U`, `V` together with their cost `J`.
#[derive(Debug, Clone)]
pub struct FactorizationState {
    u: SparseMatrix,
    v: SparseMatrix,
    cost: f64,
}

impl FactorizationState {
    /// Creates zero factors for `num_users` × `num_items` ratings.
    ///
    /// The cost starts at `f64::MAX` so that any evaluated point compares
    /// as better.
    pub fn new(
        num_users: usize,
        num_items: usize,
        latent_dimension: usize,
    ) -> OptimizerResult<Self> {
        for (parameter, value) in [
            ("num_users", num_users),
            ("num_items", num_items),
            ("latent_dimension", latent_dimension),
        ] {
            if value == 0 {
                return Err(OptimizerError::invalid_configuration(
                    "factorization dimensions must be positive",
                    parameter,
                    "0",
                ));
            }
        }

        Ok(Self {
            u: SparseMatrix::new(latent_dimension, num_users)?,
            v: SparseMatrix::new(latent_dimension, num_items)?,
            cost: f64::MAX,
        })
    }

    /// Starts from explicit factors.
    ///
    /// `u0` is latent × users and `v0` latent × items; both must share the
    /// latent dimension.
    pub fn from_matrices(u0: SparseMatrix, v0: SparseMatrix) -> OptimizerResult<Self> {
        if u0.row_dimension() != v0.row_dimension() {
            return Err(OptimizerError::invalid_configuration(
                "factor matrices must share the latent dimension",
                "seed_matrices",
                format!(
                    "U0 {}x{}, V0 {}x{}",
                    u0.row_dimension(),
                    u0.column_dimension(),
                    v0.row_dimension(),
                    v0.column_dimension()
                ),
            ));
        }

        Ok(Self {
            u: u0,
            v: v0,
            cost: f64::MAX,
        })
    }

    /// Replaces both factors with small uniform random values.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> OptimizerResult<()> {
        let (latent, users) = self.u.shape();
        let items = self.v.column_dimension();
        let u = SparseMatrix::random_dense(latent, users, rng)?;
        let v = SparseMatrix::random_dense(latent, items, rng)?;
        self.u = u.scalar_multiply(INITIAL_SCALE);
        self.v = v.scalar_multiply(INITIAL_SCALE);
        Ok(())
    }

    /// Copies factors and cost into `target`.
    ///
    /// The copies are independent: later writes to either state never show
    /// through in the other.
    pub fn copy_into(&self, target: &mut Self) {
        target.u = self.u.copy();
        target.v = self.v.copy();
        target.cost = self.cost;
    }

    /// User factors, latent × users.
    #[inline]
    pub fn u(&self) -> &SparseMatrix {
        &self.u
    }

    /// Item factors, latent × items.
    #[inline]
    pub fn v(&self) -> &SparseMatrix {
        &self.v
    }

    /// Cost last evaluated at this point.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of latent factors `k`.
    pub fn latent_dimension(&self) -> usize {
        self.u.row_dimension()
    }

    /// Column count of `U`.
    pub fn num_users(&self) -> usize {
        self.u.column_dimension()
    }

    /// Column count of `V`.
    pub fn num_items(&self) -> usize {
        self.v.column_dimension()
    }

    /// Replaces both factors; shapes must match the current ones.
    pub fn set_factors(&mut self, u: SparseMatrix, v: SparseMatrix) -> OptimizerResult<()> {
        if u.shape() != self.u.shape() || v.shape() != self.v.shape() {
            return Err(sparsemf_core::MatrixError::dimension_mismatch(
                format!("U {:?}, V {:?}", self.u.shape(), self.v.shape()),
                format!("U {:?}, V {:?}", u.shape(), v.shape()),
            )
            .into());
        }
        self.u = u;
        self.v = v;
        Ok(())
    }

    /// Records the cost of the current factors.
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    /// Predicted rating `dot(U[:, user], V[:, item])`.
    pub fn predict(&self, user: usize, item: usize) -> OptimizerResult<f64> {
        Ok(SparseMatrix::dot_columns(&self.u, user, &self.v, item)?)
    }

    /// Dense reconstruction `Uᵗ · V` (users × items).
    pub fn reconstruct(&self) -> DMatrix<f64> {
        self.u.to_dense().transpose() * self.v.to_dense()
    }
}
