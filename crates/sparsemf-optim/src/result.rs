//! Outcome of an optimization run.

use crate::point::FactorizationState;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reason for optimization termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// Relative improvement of an accepted step fell below the threshold
    Converged,
    /// Iteration budget exhausted
    MaxIterations,
    /// Step size shrank below its floor
    StepSizeUnderflow,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => f.write_str("converged"),
            Self::MaxIterations => f.write_str("maximum iterations reached"),
            Self::StepSizeUnderflow => f.write_str("step size below floor"),
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best point found, with its cost
    pub point: FactorizationState,

    /// Cost at the best point
    pub value: f64,

    /// Number of gradient steps performed
    pub iterations: usize,

    /// Number of cost evaluations, including the initial one
    pub function_evaluations: usize,

    /// Total optimization time
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,

    /// Whether the optimization converged
    pub converged: bool,
}

impl OptimizationResult {
    /// Creates a new optimization result.
    pub fn new(
        point: FactorizationState,
        iterations: usize,
        function_evaluations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            value: point.cost(),
            point,
            iterations,
            function_evaluations,
            duration,
            converged: termination_reason == TerminationReason::Converged,
            termination_reason,
        }
    }
}
