//! SparseMF Optimization - Gradient descent for sparse matrix factorization.
//!
//! This crate fits latent factors `U`, `V` to a sparse rating matrix `R`
//! by regularized gradient descent whose step size is adapted with the
//! bold-driver heuristic.
//!
//! # Components
//!
//! - **OptimizerConfig**: builder-style run configuration
//! - **FactorizationState**: a point `(U, V, J)` of the search space
//! - **GradientDescent**: the optimizer, exposing a lazy iteration stream
//! - **Solver**: runs an optimizer to termination and logs its progress
//!
//! # Examples
//!
//! ```rust
//! use sparsemf_core::SparseMatrix;
//! use sparsemf_optim::{OptimizerConfig, Solver};
//!
//! let ratings = SparseMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 2.0])?;
//! let mut solver = Solver::new(
//!     ratings,
//!     OptimizerConfig::new()
//!         .with_latent_dimension(2)
//!         .with_max_evaluations(50)
//!         .with_seed(1),
//! )?;
//! let result = solver.solve()?;
//! assert!(result.iterations <= 50);
//! # Ok::<(), sparsemf_optim::OptimizerError>(())
//! ```

pub mod config;
pub mod error;
pub mod gradient_descent;
pub mod point;
pub mod result;
pub mod solver;
pub mod step_size;

// Re-export main types for convenience
pub use config::OptimizerConfig;
pub use error::{OptimizerError, OptimizerResult};
pub use gradient_descent::{cost_function, GradientDescent, IterationRecord, Iterations};
pub use point::FactorizationState;
pub use result::{OptimizationResult, TerminationReason};
pub use solver::{FittedValue, Solver};
pub use step_size::BoldDriver;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        FactorizationState, GradientDescent, IterationRecord, OptimizationResult,
        OptimizerConfig, OptimizerError, OptimizerResult, Solver, TerminationReason,
    };
}
