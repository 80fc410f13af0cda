//! Configuration for the factorization optimizer.
//!
//! [`OptimizerConfig`] gathers every knob of one optimization run. It is
//! built with `with_*` methods on top of [`Default`] and checked once by
//! [`OptimizerConfig::validate`] when the optimizer is constructed; it is
//! never mutated afterwards.
//!
//! # Example
//!
//! ```rust
//! use sparsemf_optim::OptimizerConfig;
//!
//! let config = OptimizerConfig::new()
//!     .with_latent_dimension(10)
//!     .with_lambda(0.05)
//!     .with_max_evaluations(500)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{OptimizerError, OptimizerResult};
use sparsemf_core::SparseMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of a bold-driver gradient descent run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Number of latent dimensions of U and V
    pub latent_dimension: usize,

    /// L2 regularization weight λ
    pub lambda: f64,

    /// Maximum number of gradient steps
    pub max_evaluations: usize,

    /// Initial step size
    pub step_size: f64,

    /// Step size multiplier applied after an accepted step (> 1)
    pub grow_factor: f64,

    /// Step size multiplier applied after a rejected step, in (0, 1)
    pub shrink_factor: f64,

    /// Relative improvement, in percent, below which an accepted step
    /// counts as converged
    pub convergence_epsilon: f64,

    /// Step size floor; the run stops once a shrink falls below it
    pub min_step_size: f64,

    /// Seed for the random initialization of U and V
    pub seed: Option<u64>,

    /// Explicit starting factors `(U0, V0)`, used instead of random
    /// initialization when present
    #[cfg_attr(feature = "serde", serde(skip))]
    pub seed_matrices: Option<(SparseMatrix, SparseMatrix)>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            latent_dimension: 2,
            lambda: 0.02,
            max_evaluations: 120,
            step_size: 0.1,
            grow_factor: 1.10,
            shrink_factor: 0.7,
            convergence_epsilon: 5e-6,
            min_step_size: 1e-11,
            seed: None,
            seed_matrices: None,
        }
    }
}

impl OptimizerConfig {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latent dimension.
    pub fn with_latent_dimension(mut self, latent_dimension: usize) -> Self {
        self.latent_dimension = latent_dimension;
        self
    }

    /// Sets the regularization weight.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the maximum number of gradient steps.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Sets the initial step size.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the grow and shrink multipliers of the bold driver.
    pub fn with_step_factors(mut self, grow_factor: f64, shrink_factor: f64) -> Self {
        self.grow_factor = grow_factor;
        self.shrink_factor = shrink_factor;
        self
    }

    /// Sets the relative improvement threshold, in percent.
    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon;
        self
    }

    /// Sets the step size floor.
    pub fn with_min_step_size(mut self, min_step_size: f64) -> Self {
        self.min_step_size = min_step_size;
        self
    }

    /// Seeds the random initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starts from explicit factor matrices instead of random ones.
    ///
    /// `u0` must be latent × users and `v0` latent × items.
    pub fn with_seed_matrices(mut self, u0: SparseMatrix, v0: SparseMatrix) -> Self {
        self.latent_dimension = u0.row_dimension();
        self.seed_matrices = Some((u0, v0));
        self
    }

    /// Checks every parameter against its admissible range.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.latent_dimension == 0 {
            return Err(OptimizerError::invalid_configuration(
                "latent dimension must be positive",
                "latent_dimension",
                "0",
            ));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(OptimizerError::invalid_configuration(
                "regularization weight must be finite and non-negative",
                "lambda",
                self.lambda.to_string(),
            ));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(OptimizerError::invalid_configuration(
                "step size must be finite and positive",
                "step_size",
                self.step_size.to_string(),
            ));
        }
        if !self.grow_factor.is_finite() || self.grow_factor <= 1.0 {
            return Err(OptimizerError::invalid_configuration(
                "grow factor must be greater than 1",
                "grow_factor",
                self.grow_factor.to_string(),
            ));
        }
        if self.shrink_factor.is_nan() || self.shrink_factor <= 0.0 || self.shrink_factor >= 1.0 {
            return Err(OptimizerError::invalid_configuration(
                "shrink factor must lie in (0, 1)",
                "shrink_factor",
                self.shrink_factor.to_string(),
            ));
        }
        if self.convergence_epsilon.is_nan() || self.convergence_epsilon < 0.0 {
            return Err(OptimizerError::invalid_configuration(
                "convergence epsilon must be non-negative",
                "convergence_epsilon",
                self.convergence_epsilon.to_string(),
            ));
        }
        if self.min_step_size.is_nan()
            || self.min_step_size < 0.0
            || self.min_step_size >= self.step_size
        {
            return Err(OptimizerError::invalid_configuration(
                "step size floor must be non-negative and below the initial step size",
                "min_step_size",
                self.min_step_size.to_string(),
            ));
        }
        if let Some((u0, v0)) = &self.seed_matrices {
            if u0.row_dimension() != self.latent_dimension
                || v0.row_dimension() != self.latent_dimension
            {
                return Err(OptimizerError::invalid_configuration(
                    "seed matrices must both have latent_dimension rows",
                    "seed_matrices",
                    format!("{} and {} rows", u0.row_dimension(), v0.row_dimension()),
                ));
            }
        }
        Ok(())
    }
}
