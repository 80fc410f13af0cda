//! Bold-driver step size control.
//!
//! The bold driver adapts the gradient step to the observed cost instead of
//! following a fixed schedule. After every trial step the optimizer reports
//! whether the step lowered the best cost seen so far:
//!
//! - **Accepted**: the step is kept and the next step grows, αₖ₊₁ = γ·αₖ
//!   with γ > 1.
//! - **Rejected**: the step is rolled back and the next step shrinks,
//!   αₖ₊₁ = β·αₖ with 0 < β < 1.
//!
//! A long run of rejections drives αₖ geometrically towards zero. Once a
//! shrink takes it below the configured floor, further trial steps cannot
//! change the factors by a meaningful amount and the run stops.
//!
//! # Example
//!
//! ```rust
//! use sparsemf_optim::BoldDriver;
//!
//! let mut driver = BoldDriver::new(0.1, 1.1, 0.5, 0.04);
//! driver.accept();
//! assert!((driver.current() - 0.11).abs() < 1e-12);
//!
//! driver.reject();
//! driver.reject();
//! assert!(driver.below_floor());
//! ```

/// Multiplicative step size controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoldDriver {
    current: f64,
    grow_factor: f64,
    shrink_factor: f64,
    floor: f64,
}

impl BoldDriver {
    /// Creates a controller starting at `initial`.
    ///
    /// The factors are not checked here; the optimizer configuration
    /// validates them before a driver is built.
    pub fn new(initial: f64, grow_factor: f64, shrink_factor: f64, floor: f64) -> Self {
        Self {
            current: initial,
            grow_factor,
            shrink_factor,
            floor,
        }
    }

    /// Step size for the next trial step.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Grows the step after an improving step and returns the new value.
    pub fn accept(&mut self) -> f64 {
        self.current *= self.grow_factor;
        self.current
    }

    /// Shrinks the step after a rejected step and returns the new value.
    pub fn reject(&mut self) -> f64 {
        self.current *= self.shrink_factor;
        self.current
    }

    /// Whether the step has fallen strictly below the floor.
    #[inline]
    pub fn below_floor(&self) -> bool {
        self.current < self.floor
    }
}
