//! High-level entry point pairing a rating matrix with an optimizer run.

use crate::config::OptimizerConfig;
use crate::error::OptimizerResult;
use crate::gradient_descent::GradientDescent;
use crate::point::FactorizationState;
use crate::result::OptimizationResult;
use nalgebra::DMatrix;
use sparsemf_core::SparseMatrix;
use tracing::{debug, info};

/// An observed rating next to the model's prediction for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedValue {
    /// Row (user) index
    pub row: usize,
    /// Column (item) index
    pub column: usize,
    /// Value stored in the target
    pub observed: f64,
    /// `dot(U[:, row], V[:, column])` at the best point
    pub predicted: f64,
}

/// Factorizes one target matrix.
///
/// Construction validates the configuration and evaluates the starting
/// point; [`Solver::solve`] then runs the optimizer to termination and logs
/// its progress through `tracing`.
#[derive(Debug)]
pub struct Solver {
    optimizer: GradientDescent,
}

impl Solver {
    /// Builds the optimizer, failing on an invalid configuration or target.
    pub fn new(target: SparseMatrix, config: OptimizerConfig) -> OptimizerResult<Self> {
        Ok(Self {
            optimizer: GradientDescent::new(target, config)?,
        })
    }

    /// Runs the optimizer until it terminates.
    pub fn solve(&mut self) -> OptimizerResult<OptimizationResult> {
        let (users, items) = self.optimizer.target().shape();
        info!(
            users,
            items,
            observations = self.optimizer.target().non_zero_count(),
            latent_dimension = self.optimizer.config().latent_dimension,
            initial_cost = self.optimizer.best().cost(),
            "starting factorization"
        );

        for record in self.optimizer.iterations() {
            let record = record?;
            debug!(
                iteration = record.iteration,
                step_size = record.step_size,
                cost = record.cost,
                best_cost = record.best_cost,
                accepted = record.accepted,
                improvement_rate = record.improvement_rate,
                "gradient step"
            );
        }

        let result = self.optimizer.run()?;
        info!(
            iterations = result.iterations,
            evaluations = result.function_evaluations,
            cost = result.value,
            reason = %result.termination_reason,
            elapsed_ms = result.duration.as_millis() as u64,
            "factorization finished"
        );
        Ok(result)
    }

    /// Best point found so far.
    pub fn best(&self) -> &FactorizationState {
        self.optimizer.best()
    }

    /// Number of iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.optimizer.iteration()
    }

    /// Dense `Uᵗ·V` of the best point.
    pub fn reconstruction(&self) -> DMatrix<f64> {
        self.optimizer.best().reconstruct()
    }

    /// Matrix being factorized.
    pub fn target(&self) -> &SparseMatrix {
        self.optimizer.target()
    }

    /// Observed and predicted values over the support of the target, in
    /// row-major order.
    pub fn fitted_values(&self) -> OptimizerResult<Vec<FittedValue>> {
        let best = self.optimizer.best();
        let mut fitted = self
            .target()
            .iter()
            .map(|(row, column, observed)| {
                Ok(FittedValue {
                    row,
                    column,
                    observed,
                    predicted: best.predict(row, column)?,
                })
            })
            .collect::<OptimizerResult<Vec<_>>>()?;
        fitted.sort_by_key(|value| (value.row, value.column));
        Ok(fitted)
    }
}
