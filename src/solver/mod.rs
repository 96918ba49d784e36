//! Root-finding primitives used by yield solving and curve bootstrapping
//!
//! The valuation code never calls a concrete algorithm directly. It hands an
//! objective function and a [`ConvergenceParams`] to anything implementing
//! [`RootFinder`]:
//! - [`NewtonSolver`]: Newton-Raphson with a central-difference derivative (default)
//! - [`BisectionSolver`]: bracketing fallback over a fixed interval
//! - any closure `Fn(&dyn Fn(f64) -> f64, &ConvergenceParams) -> SolverResult<Solution>`

mod bisection;
mod newton;

pub use bisection::BisectionSolver;
pub use newton::{NewtonSolver, DEFAULT_DERIVATIVE_STEP, MIN_DERIVATIVE};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default starting point for the iteration
pub const DEFAULT_INITIAL_GUESS: f64 = 0.5;

/// Default step-size tolerance
pub const DEFAULT_TOLERANCE: f64 = 1.48e-8;

/// Default iteration budget
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Result type for root-finding
pub type SolverResult<T> = Result<T, SolverError>;

/// Reasons a root finder stops without a root
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("no convergence after {iterations} iterations (last step {last_step:.3e})")]
    IterationLimit { iterations: u32, last_step: f64 },

    #[error("degenerate derivative {derivative:.3e} at x = {at}")]
    DegenerateDerivative { at: f64, derivative: f64 },

    #[error("objective is not finite at x = {at}")]
    NonFiniteObjective { at: f64 },

    #[error("bracket [{low}, {high}] does not straddle a root")]
    InvalidBracket { low: f64, high: f64 },

    #[error("invalid solver parameters: {reason}")]
    InvalidParams { reason: String },
}

/// Seed, tolerance and iteration budget for a single solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceParams {
    /// Starting point for the iteration
    pub initial_guess: f64,

    /// Convergence is declared once a step is smaller than this
    pub tolerance: f64,

    /// Hard cap on iterations; exhausting it is a failure
    pub max_iterations: u32,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ConvergenceParams {
    pub fn new(initial_guess: f64, tolerance: f64, max_iterations: u32) -> Self {
        Self {
            initial_guess,
            tolerance,
            max_iterations,
        }
    }

    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check the parameters before any objective evaluation
    pub fn validate(&self) -> SolverResult<()> {
        if !self.initial_guess.is_finite() {
            return Err(SolverError::InvalidParams {
                reason: format!("initial guess must be finite, got {}", self.initial_guess),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidParams {
                reason: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidParams {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// A converged root with iteration statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub root: f64,
    pub iterations: u32,
    /// Objective value at `root`
    pub residual: f64,
}

/// Capability to solve `objective(x) = 0`
///
/// Implementations must either return a converged [`Solution`] or an error;
/// they never hand back the last iterate of a failed search.
pub trait RootFinder {
    fn find_root(
        &self,
        objective: &dyn Fn(f64) -> f64,
        params: &ConvergenceParams,
    ) -> SolverResult<Solution>;
}

impl<F> RootFinder for F
where
    F: Fn(&dyn Fn(f64) -> f64, &ConvergenceParams) -> SolverResult<Solution>,
{
    fn find_root(
        &self,
        objective: &dyn Fn(f64) -> f64,
        params: &ConvergenceParams,
    ) -> SolverResult<Solution> {
        self(objective, params)
    }
}
