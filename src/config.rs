//! Solver configuration with environment overrides
//!
//! Recognized variables (unset or unparsable values fall back to defaults):
//!   BOND_SOLVER_INITIAL_GUESS, BOND_SOLVER_TOLERANCE, BOND_SOLVER_MAX_ITERATIONS,
//!   BOND_CURVE_INITIAL_GUESS, BOND_SOLVER_DERIVATIVE_STEP

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curve::SpotCurveBootstrapper;
use crate::pricing::YieldSolver;
use crate::solver::{ConvergenceParams, NewtonSolver, DEFAULT_DERIVATIVE_STEP};

pub const ENV_INITIAL_GUESS: &str = "BOND_SOLVER_INITIAL_GUESS";
pub const ENV_TOLERANCE: &str = "BOND_SOLVER_TOLERANCE";
pub const ENV_MAX_ITERATIONS: &str = "BOND_SOLVER_MAX_ITERATIONS";
pub const ENV_CURVE_INITIAL_GUESS: &str = "BOND_CURVE_INITIAL_GUESS";
pub const ENV_DERIVATIVE_STEP: &str = "BOND_SOLVER_DERIVATIVE_STEP";

/// Settings shared by every solve in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Convergence for yield-to-maturity solves (seed in percent)
    pub yield_convergence: ConvergenceParams,

    /// Convergence for bootstrap solves (seed as a decimal rate)
    pub curve_convergence: ConvergenceParams,

    /// Relative finite-difference step for the Newton derivative
    pub derivative_step: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            yield_convergence: ConvergenceParams::default(),
            curve_convergence: ConvergenceParams::default(),
            derivative_step: DEFAULT_DERIVATIVE_STEP,
        }
    }
}

impl ValuationConfig {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let tolerance = parse_or(&lookup, ENV_TOLERANCE, config.yield_convergence.tolerance);
        let max_iterations = parse_or(&lookup, ENV_MAX_ITERATIONS, config.yield_convergence.max_iterations);

        config.yield_convergence = ConvergenceParams {
            initial_guess: parse_or(&lookup, ENV_INITIAL_GUESS, config.yield_convergence.initial_guess),
            tolerance,
            max_iterations,
        };
        config.curve_convergence = ConvergenceParams {
            initial_guess: parse_or(&lookup, ENV_CURVE_INITIAL_GUESS, config.curve_convergence.initial_guess),
            tolerance,
            max_iterations,
        };
        config.derivative_step = parse_or(&lookup, ENV_DERIVATIVE_STEP, config.derivative_step);

        config
    }

    pub fn newton(&self) -> NewtonSolver {
        NewtonSolver::with_derivative_step(self.derivative_step)
    }

    pub fn yield_solver(&self) -> YieldSolver<NewtonSolver> {
        YieldSolver::with_root_finder(self.newton()).with_params(self.yield_convergence)
    }

    pub fn bootstrapper(&self) -> SpotCurveBootstrapper<NewtonSolver> {
        SpotCurveBootstrapper::with_root_finder(self.newton()).with_params(self.curve_convergence)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
