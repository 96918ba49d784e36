//! Newton-Raphson root finding
//!
//! Objectives are opaque closures, so the derivative is estimated with a
//! central difference whose step scales with the magnitude of the iterate.

use log::trace;

use super::{ConvergenceParams, RootFinder, Solution, SolverError, SolverResult};

/// Relative step for the central-difference derivative
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-6;

/// Derivatives smaller than this in magnitude are treated as flat
pub const MIN_DERIVATIVE: f64 = 1e-15;

/// Newton-Raphson solver with a numerical derivative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolver {
    /// Relative finite-difference step (absolute below |x| = 1)
    pub derivative_step: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            derivative_step: DEFAULT_DERIVATIVE_STEP,
        }
    }
}

impl NewtonSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_derivative_step(derivative_step: f64) -> Self {
        Self { derivative_step }
    }

    /// Central-difference slope of `objective` at `x`
    fn derivative(&self, objective: &dyn Fn(f64) -> f64, x: f64) -> f64 {
        let h = self.derivative_step * x.abs().max(1.0);
        (objective(x + h) - objective(x - h)) / (2.0 * h)
    }
}

impl RootFinder for NewtonSolver {
    fn find_root(
        &self,
        objective: &dyn Fn(f64) -> f64,
        params: &ConvergenceParams,
    ) -> SolverResult<Solution> {
        params.validate()?;
        if !(self.derivative_step.is_finite() && self.derivative_step > 0.0) {
            return Err(SolverError::InvalidParams {
                reason: format!("derivative step must be positive, got {}", self.derivative_step),
            });
        }

        let mut x = params.initial_guess;
        let mut last_step = f64::INFINITY;

        for iteration in 0..params.max_iterations {
            let fx = objective(x);
            if !fx.is_finite() {
                return Err(SolverError::NonFiniteObjective { at: x });
            }

            // Landed exactly on the root
            if fx == 0.0 {
                return Ok(Solution { root: x, iterations: iteration, residual: fx });
            }

            let dfx = self.derivative(objective, x);
            if !dfx.is_finite() || dfx.abs() < MIN_DERIVATIVE {
                return Err(SolverError::DegenerateDerivative { at: x, derivative: dfx });
            }

            let step = fx / dfx;
            let next = x - step;
            trace!("newton iteration {}: x={} f={} df={} next={}", iteration, x, fx, dfx, next);

            if step.abs() < params.tolerance {
                let residual = objective(next);
                if !residual.is_finite() {
                    return Err(SolverError::NonFiniteObjective { at: next });
                }
                return Ok(Solution { root: next, iterations: iteration + 1, residual });
            }

            x = next;
            last_step = step;
        }

        Err(SolverError::IterationLimit {
            iterations: params.max_iterations,
            last_step,
        })
    }
}
