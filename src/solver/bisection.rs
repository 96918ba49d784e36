//! Bisection root finding over a fixed bracket
//!
//! Slower than Newton but cannot diverge once the bracket straddles a root.
//! The seed in [`ConvergenceParams`] is ignored.

use log::trace;

use super::{ConvergenceParams, RootFinder, Solution, SolverError, SolverResult};

/// Bisection solver searching `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectionSolver {
    pub low: f64,
    pub high: f64,
}

impl BisectionSolver {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl RootFinder for BisectionSolver {
    fn find_root(
        &self,
        objective: &dyn Fn(f64) -> f64,
        params: &ConvergenceParams,
    ) -> SolverResult<Solution> {
        params.validate()?;

        let mut low = self.low.min(self.high);
        let mut high = self.low.max(self.high);

        let mut f_low = objective(low);
        let f_high = objective(high);
        if !f_low.is_finite() {
            return Err(SolverError::NonFiniteObjective { at: low });
        }
        if !f_high.is_finite() {
            return Err(SolverError::NonFiniteObjective { at: high });
        }

        // Check that we have a root in this interval
        if f_low * f_high > 0.0 {
            return Err(SolverError::InvalidBracket { low, high });
        }

        for iteration in 0..params.max_iterations {
            let mid = 0.5 * (low + high);
            let f_mid = objective(mid);
            if !f_mid.is_finite() {
                return Err(SolverError::NonFiniteObjective { at: mid });
            }
            trace!("bisection iteration {}: [{}, {}] f(mid)={}", iteration, low, high, f_mid);

            if f_mid == 0.0 || 0.5 * (high - low) < params.tolerance {
                return Ok(Solution { root: mid, iterations: iteration + 1, residual: f_mid });
            }

            if f_mid * f_low < 0.0 {
                high = mid;
            } else {
                low = mid;
                f_low = f_mid;
            }
        }

        Err(SolverError::IterationLimit {
            iterations: params.max_iterations,
            last_step: high - low,
        })
    }
}
