//! # SparseMF
//!
//! Sparse low-rank matrix factorization for collaborative filtering.
//!
//! A partially observed rating matrix `R` (users × items) is approximated
//! by `UᵗV`, with `U` (k × users) and `V` (k × items) fitted by regularized
//! gradient descent on the observed entries only. The step size follows the
//! bold-driver heuristic: it grows after every improving step and shrinks,
//! with a rollback, after every step that does not improve.
//!
//! ## Crates
//!
//! - `sparsemf-core`: the [`SparseMatrix`] engine
//! - `sparsemf-optim`: [`GradientDescent`] and the [`Solver`] entry point
//! - `sparsemf-data`: rating file loading, held-out splits and metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use sparsemf::prelude::*;
//!
//! let text = "\
//! alice matrix 5\nalice alien 3\nbob matrix 4\nbob brazil 1\n\
//! carol alien 4\ncarol brazil 2\ndave matrix 5\ndave alien 3\n";
//! let mut dataset = TrainingDataset::from_reader(std::io::Cursor::new(text))?;
//! let mut rng = StdRng::seed_from_u64(42);
//! dataset.split(25.0, 0.0, &mut rng)?;
//!
//! let config = OptimizerConfig::new()
//!     .with_latent_dimension(2)
//!     .with_max_evaluations(100)
//!     .with_seed(42);
//! let mut solver = Solver::new(dataset.matrix().copy(), config)?;
//! let result = solver.solve()?;
//!
//! let report = evaluate(&dataset, result.point.u(), result.point.v(), &mut rng)?;
//! assert_eq!(report.model.count, 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;

// Re-export the component crates
pub use sparsemf_core::{Axis, MatrixError, Orientation, SparseMatrix};
pub use sparsemf_data::{evaluate, DataError, ErrorSummary, EvaluationReport, TrainingDataset};
pub use sparsemf_optim::{
    cost_function, BoldDriver, FactorizationState, FittedValue, GradientDescent,
    IterationRecord, OptimizationResult, OptimizerConfig, OptimizerError, OptimizerResult,
    Solver, TerminationReason,
};

// Re-export nalgebra for users who need dense reconstructions
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use sparsemf_core::prelude::*;
    pub use sparsemf_data::{evaluate, DataError, EvaluationReport, TrainingDataset};
    pub use sparsemf_optim::prelude::*;

    pub use crate::logging::{init_tracing, TracingConfig, TracingFormat};
}
