//! Batch runner for independent valuations
//!
//! Pricing and yield solves for different bonds share no state, so batches
//! fan out across the rayon thread pool. Each bootstrap stays sequential
//! internally; only separate curves run side by side. Results keep input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bond::BondSpec;
use crate::config::ValuationConfig;
use crate::curve::{CurveInputs, SpotCurve, SpotCurveBootstrapper};
use crate::error::ValuationResult;
use crate::pricing::{PresentValueEngine, YieldSolver};
use crate::solver::{NewtonSolver, RootFinder};

/// An observed price for a bond
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bond: BondSpec,
    pub observed_price: f64,
}

/// Runs many independent valuations with shared solver settings
#[derive(Debug, Clone)]
pub struct ScenarioRunner<R = NewtonSolver> {
    yield_solver: YieldSolver<R>,
    bootstrapper: SpotCurveBootstrapper<R>,
}

impl ScenarioRunner<NewtonSolver> {
    pub fn new() -> Self {
        Self::from_config(&ValuationConfig::default())
    }

    pub fn from_config(config: &ValuationConfig) -> Self {
        Self {
            yield_solver: config.yield_solver(),
            bootstrapper: config.bootstrapper(),
        }
    }
}

impl Default for ScenarioRunner<NewtonSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RootFinder + Sync> ScenarioRunner<R> {
    pub fn with_solvers(yield_solver: YieldSolver<R>, bootstrapper: SpotCurveBootstrapper<R>) -> Self {
        Self {
            yield_solver,
            bootstrapper,
        }
    }

    /// Price one bond at each yield (percent)
    pub fn price_grid(&self, bond: &BondSpec, yields_percent: &[f64]) -> Vec<ValuationResult<f64>> {
        yields_percent
            .par_iter()
            .map(|&y| PresentValueEngine::price(bond, y))
            .collect()
    }

    /// Implied yield (percent) for each quote
    pub fn implied_yields(&self, quotes: &[Quote]) -> Vec<ValuationResult<f64>> {
        quotes
            .par_iter()
            .map(|quote| self.yield_solver.implied_yield(quote.observed_price, &quote.bond))
            .collect()
    }

    /// One curve per set of inputs
    pub fn bootstrap_batch(&self, inputs: &[CurveInputs]) -> Vec<ValuationResult<SpotCurve>> {
        inputs
            .par_iter()
            .map(|curve_inputs| self.bootstrapper.bootstrap_inputs(curve_inputs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    fn bonds() -> Vec<BondSpec> {
        vec![
            BondSpec::new(100.0, 5.0, 5.0, 12).unwrap(),
            BondSpec::new(100.0, 10.0, 2.0, 2).unwrap(),
            BondSpec::new(1000.0, 3.0, 7.5, 4).unwrap(),
        ]
    }

    #[test]
    fn test_price_grid_keeps_order() {
        let runner = ScenarioRunner::new();
        let bond = bonds()[0];
        let yields = [3.0, 4.0, 5.0, 6.0, -1200.0];

        let results = runner.price_grid(&bond, &yields);
        assert_eq!(results.len(), 5);

        let prices: Vec<f64> = results[..4].iter().map(|r| *r.as_ref().unwrap()).collect();
        assert!(prices.windows(2).all(|pair| pair[0] > pair[1]));
        assert!((prices[2] - 100.0).abs() < 1e-9);
        assert!(matches!(results[4], Err(ValuationError::NumericDegeneracy { .. })));
    }

    #[test]
    fn test_implied_yields_round_trip() {
        let runner = ScenarioRunner::new();
        let targets = [4.2, 1.1, 9.75];

        let quotes: Vec<Quote> = bonds()
            .into_iter()
            .zip(targets)
            .map(|(bond, y)| Quote {
                bond,
                observed_price: PresentValueEngine::price(&bond, y).unwrap(),
            })
            .collect();

        let yields = runner.implied_yields(&quotes);
        for (result, target) in yields.iter().zip(targets) {
            let ytm = *result.as_ref().unwrap();
            assert!((ytm - target).abs() < 1e-7, "expected {} got {}", target, ytm);
        }
    }

    #[test]
    fn test_bootstrap_batch_isolates_failures() {
        let runner = ScenarioRunner::new();
        let good = CurveInputs {
            observed_price: 100.0,
            tenors: vec![0.5, 1.0, 1.5, 2.0],
            coupon_rates_percent: vec![5.0, 5.5, 6.0, 6.5],
            face_value: 100.0,
            payments_per_year: 2,
        };
        let bad = CurveInputs {
            tenors: vec![0.5, 1.0],
            ..good.clone()
        };

        let results = runner.bootstrap_batch(&[good, bad]);
        assert_eq!(results[0].as_ref().unwrap().len(), 4);
        assert!(results[1].as_ref().unwrap_err().is_invalid_input());
    }
}
