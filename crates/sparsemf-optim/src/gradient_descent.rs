//! Regularized gradient descent with bold-driver step control.
//!
//! This module factorizes a sparse rating matrix `R` (users × items) into
//! latent factors `U` (k × users) and `V` (k × items) such that `Uᵗ·V`
//! approximates `R` on its observed entries Ω.
//!
//! # Objective
//!
//! ```text
//! J(U, V) = ½‖P_Ω(R − UᵗV)‖²_F + λ/2 (‖U‖²_F + ‖V‖²_F)
//! ```
//!
//! where `P_Ω` keeps only the observed positions. The residual is evaluated
//! directly on Ω, so the dense product `UᵗV` is never formed.
//!
//! # Update
//!
//! With `E = −P_Ω(R − UᵗV)`, one gradient step computes
//!
//! ```text
//! ∇Uᵗ = E·Vᵗ + λUᵗ        U ← U − α(∇Uᵗ)ᵗ
//! ∇Vᵗ = Eᵗ·Uᵗ + λVᵗ       V ← V − α(∇Vᵗ)ᵗ
//! ```
//!
//! Both gradients are taken at the same pre-step point (a simultaneous
//! update).
//!
//! # Step control
//!
//! Every iteration performs one trial step from the working point. If it
//! lowers the best cost, the working point becomes the best point and the
//! step grows; otherwise the working point is rolled back to the best point
//! and the step shrinks (see [`BoldDriver`]). The run stops when the
//! relative improvement of an accepted step drops below
//! `convergence_epsilon` percent, when the step falls below its floor, or
//! when the iteration budget is spent. A best cost of exactly zero cannot
//! be improved on and counts as converged, including at the starting point.
//!
//! # Example
//!
//! ```rust
//! use sparsemf_core::SparseMatrix;
//! use sparsemf_optim::{GradientDescent, OptimizerConfig};
//!
//! let ratings = SparseMatrix::from_row_slice(2, 3, &[5.0, 0.0, 1.0, 0.0, 4.0, 2.0])?;
//! let config = OptimizerConfig::new().with_latent_dimension(2).with_seed(7);
//!
//! let mut optimizer = GradientDescent::new(ratings, config)?;
//! for record in optimizer.iterations().take(5) {
//!     let record = record?;
//!     assert!(record.best_cost <= record.cost || !record.accepted);
//! }
//! let result = optimizer.run()?;
//! assert!(result.iterations <= 120);
//! # Ok::<(), sparsemf_optim::OptimizerError>(())
//! ```

use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, OptimizerResult};
use crate::point::FactorizationState;
use crate::result::{OptimizationResult, TerminationReason};
use crate::step_size::BoldDriver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparsemf_core::SparseMatrix;
use std::time::{Duration, Instant};

/// Evaluates the regularized objective `J(U, V)` against `target`.
pub fn cost_function(
    target: &SparseMatrix,
    u: &SparseMatrix,
    v: &SparseMatrix,
    lambda: f64,
) -> OptimizerResult<f64> {
    let residual = target.residual_over_support(&u.transpose(), v)?;
    Ok(0.5 * residual.frobenius_norm_squared()
        + 0.5 * lambda * (u.frobenius_norm_squared() + v.frobenius_norm_squared()))
}

/// Summary of one bold-driver iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration index
    pub iteration: usize,
    /// Step size used by this iteration's trial step
    pub step_size: f64,
    /// Step size the next iteration will use
    pub next_step_size: f64,
    /// Cost at the trial point
    pub cost: f64,
    /// Best cost after this iteration
    pub best_cost: f64,
    /// Whether the trial point was kept
    pub accepted: bool,
    /// Relative improvement in percent, for accepted steps
    pub improvement_rate: Option<f64>,
}

/// Bold-driver gradient descent over a fixed target matrix.
#[derive(Debug)]
pub struct GradientDescent {
    target: SparseMatrix,
    config: OptimizerConfig,
    working: FactorizationState,
    best: FactorizationState,
    driver: BoldDriver,
    iteration: usize,
    evaluations: usize,
    termination: Option<TerminationReason>,
    elapsed: Duration,
}

impl GradientDescent {
    /// Creates an optimizer for `target`.
    ///
    /// The starting point is `config.seed_matrices` when present, otherwise
    /// small random factors drawn from a generator seeded with `config.seed`
    /// (or from entropy). The initial cost is evaluated once here.
    pub fn new(target: SparseMatrix, config: OptimizerConfig) -> OptimizerResult<Self> {
        let started = Instant::now();
        config.validate()?;

        let (users, items) = target.shape();
        let mut working = match &config.seed_matrices {
            Some((u0, v0)) => {
                if u0.column_dimension() != users || v0.column_dimension() != items {
                    return Err(OptimizerError::invalid_configuration(
                        "seed matrices do not match the target shape",
                        "seed_matrices",
                        format!(
                            "U0 has {} columns, V0 has {} columns, target is {users}x{items}",
                            u0.column_dimension(),
                            v0.column_dimension()
                        ),
                    ));
                }
                FactorizationState::from_matrices(u0.copy(), v0.copy())?
            }
            None => {
                let mut rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut state = FactorizationState::new(users, items, config.latent_dimension)?;
                state.initialize(&mut rng)?;
                state
            }
        };

        working.set_cost(cost_function(&target, working.u(), working.v(), config.lambda)?);
        let best = working.clone();
        let driver = BoldDriver::new(
            config.step_size,
            config.grow_factor,
            config.shrink_factor,
            config.min_step_size,
        );
        let termination = if best.cost() == 0.0 {
            Some(TerminationReason::Converged)
        } else if config.max_evaluations == 0 {
            Some(TerminationReason::MaxIterations)
        } else {
            None
        };

        Ok(Self {
            target,
            config,
            working,
            best,
            driver,
            iteration: 0,
            evaluations: 1,
            termination,
            elapsed: started.elapsed(),
        })
    }

    /// Performs one bold-driver iteration.
    ///
    /// Returns `Ok(None)` once the run has terminated; further calls keep
    /// returning `Ok(None)`.
    pub fn iterate(&mut self) -> OptimizerResult<Option<IterationRecord>> {
        if self.termination.is_some() {
            return Ok(None);
        }
        let started = Instant::now();

        let step_size = self.driver.current();
        self.gradient_step(step_size)?;
        self.iteration += 1;

        let cost = self.working.cost();
        let previous_best = self.best.cost();
        let (accepted, improvement_rate) = if cost < previous_best {
            // cost >= 0, so previous_best > 0 here
            let rate = (previous_best - cost) * 100.0 / previous_best;
            self.working.copy_into(&mut self.best);
            self.driver.accept();
            if cost == 0.0 || rate < self.config.convergence_epsilon {
                self.termination = Some(TerminationReason::Converged);
            }
            (true, Some(rate))
        } else {
            self.driver.reject();
            self.best.copy_into(&mut self.working);
            if self.driver.below_floor() {
                self.termination = Some(TerminationReason::StepSizeUnderflow);
            }
            (false, None)
        };

        if self.termination.is_none() && self.iteration >= self.config.max_evaluations {
            self.termination = Some(TerminationReason::MaxIterations);
        }
        self.elapsed += started.elapsed();

        Ok(Some(IterationRecord {
            iteration: self.iteration,
            step_size,
            next_step_size: self.driver.current(),
            cost,
            best_cost: self.best.cost(),
            accepted,
            improvement_rate,
        }))
    }

    /// Lazy sequence of iteration records.
    ///
    /// Dropping the iterator pauses the run; calling `iterations()` again
    /// resumes from the current state.
    pub fn iterations(&mut self) -> Iterations<'_> {
        Iterations { optimizer: self }
    }

    /// Runs to termination and returns the outcome.
    pub fn run(&mut self) -> OptimizerResult<OptimizationResult> {
        for record in self.iterations() {
            record?;
        }
        let reason = self.termination.unwrap_or(TerminationReason::MaxIterations);
        Ok(self.snapshot(reason))
    }

    /// Outcome of a terminated run, `None` while iterations remain.
    pub fn result(&self) -> Option<OptimizationResult> {
        self.termination.map(|reason| self.snapshot(reason))
    }

    /// Best point found so far.
    pub fn best(&self) -> &FactorizationState {
        &self.best
    }

    /// Point the next trial step starts from.
    pub fn working(&self) -> &FactorizationState {
        &self.working
    }

    /// Matrix being factorized.
    pub fn target(&self) -> &SparseMatrix {
        &self.target
    }

    /// Configuration the run was built with.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Step size of the next trial step.
    pub fn step_size(&self) -> f64 {
        self.driver.current()
    }

    /// Number of iterations performed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Number of cost evaluations, including the initial one.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Why the run stopped, `None` while it can continue.
    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    fn snapshot(&self, reason: TerminationReason) -> OptimizationResult {
        OptimizationResult::new(
            self.best.clone(),
            self.iteration,
            self.evaluations,
            self.elapsed,
            reason,
        )
    }

    /// Moves `working` one gradient step and re-evaluates its cost.
    fn gradient_step(&mut self, step_size: f64) -> OptimizerResult<()> {
        let lambda = self.config.lambda;
        let u = self.working.u();
        let v = self.working.v();
        let ut = u.transpose();
        let vt = v.transpose();

        let residual = self.target.residual_over_support(&ut, v)?;
        let error = residual.scalar_multiply(-1.0);
        let grad_ut = error.multiply(&vt)?.add(&ut.scalar_multiply(lambda))?;
        let grad_vt = error
            .transpose()
            .multiply(&ut)?
            .add(&vt.scalar_multiply(lambda))?;

        let u_next = u.subtract(&grad_ut.transpose().scalar_multiply(step_size))?;
        let v_next = v.subtract(&grad_vt.transpose().scalar_multiply(step_size))?;
        let cost = cost_function(&self.target, &u_next, &v_next, lambda)?;

        self.working.set_factors(u_next, v_next)?;
        self.working.set_cost(cost);
        self.evaluations += 1;
        Ok(())
    }
}

/// Iterator over the remaining iterations of a [`GradientDescent`] run.
#[derive(Debug)]
pub struct Iterations<'a> {
    optimizer: &'a mut GradientDescent,
}

impl Iterator for Iterations<'_> {
    type Item = OptimizerResult<IterationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.optimizer.iterate().transpose()
    }
}
