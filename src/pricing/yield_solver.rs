//! Yield-to-maturity from an observed price

use log::debug;

use crate::bond::BondSpec;
use crate::error::{ensure_finite, Operation, ValuationError, ValuationResult};
use crate::solver::{ConvergenceParams, NewtonSolver, RootFinder};

/// Recovers the flat yield that reprices a bond to an observed price
///
/// The objective is the same schedule discounting used by
/// [`PresentValueEngine`](super::PresentValueEngine), evaluated repeatedly by
/// the root finder. Yields are in percent.
#[derive(Debug, Clone)]
pub struct YieldSolver<R = NewtonSolver> {
    root_finder: R,
    params: ConvergenceParams,
}

impl YieldSolver<NewtonSolver> {
    /// Newton solver with default convergence parameters (seed 0.5)
    pub fn new() -> Self {
        Self::with_root_finder(NewtonSolver::default())
    }
}

impl Default for YieldSolver<NewtonSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RootFinder> YieldSolver<R> {
    pub fn with_root_finder(root_finder: R) -> Self {
        Self {
            root_finder,
            params: ConvergenceParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: ConvergenceParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.params.initial_guess = initial_guess;
        self
    }

    pub fn params(&self) -> &ConvergenceParams {
        &self.params
    }

    /// Annual flat yield (percent) at which the bond is worth `observed_price`
    ///
    /// Fails with [`ValuationError::NonConvergence`] when the root finder
    /// cannot find such a yield; no partial value is returned.
    pub fn implied_yield(&self, observed_price: f64, bond: &BondSpec) -> ValuationResult<f64> {
        let observed_price = ensure_finite("observed_price", observed_price)?;

        let schedule = bond.cash_flows();
        let frequency = bond.frequency();
        let objective = |flat_yield_percent: f64| {
            let periodic_rate = bond.periodic_rate(flat_yield_percent);
            if 1.0 + periodic_rate <= 0.0 {
                return f64::NAN;
            }
            schedule.discounted_at(periodic_rate, frequency) - observed_price
        };

        let solution = self
            .root_finder
            .find_root(&objective, &self.params)
            .map_err(|source| ValuationError::NonConvergence {
                operation: Operation::ImpliedYield,
                tenor_index: None,
                source,
            })?;

        debug!(
            "implied yield {}% for price {} after {} iterations (residual {:.3e})",
            solution.root, observed_price, solution.iterations, solution.residual
        );
        Ok(solution.root)
    }
}
