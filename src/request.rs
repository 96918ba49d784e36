//! JSON request/response model shared by the CLI and the Lambda handler

use serde::{Deserialize, Serialize};

use crate::bond::{BondSpec, CashFlowSchedule};
use crate::config::ValuationConfig;
use crate::curve::{CurveInputs, SpotCurve};
use crate::error::{ValuationError, ValuationResult};
use crate::pricing::PresentValueEngine;
use crate::solver::ConvergenceParams;

/// A single valuation, tagged by `"operation"`
///
/// ```json
/// {"operation": "price", "bond": {...}, "flat_yield_percent": 5.1}
/// {"operation": "implied_yield", "bond": {...}, "observed_price": 99.56}
/// {"operation": "bootstrap", "observed_price": 100, "tenors": [...], ...}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ValuationRequest {
    Price {
        bond: BondSpec,
        flat_yield_percent: f64,
    },
    ImpliedYield {
        bond: BondSpec,
        observed_price: f64,
        /// Overrides the configured yield convergence when present
        #[serde(default)]
        convergence: Option<ConvergenceParams>,
    },
    Bootstrap {
        #[serde(flatten)]
        inputs: CurveInputs,
        /// Overrides the configured curve convergence when present
        #[serde(default)]
        convergence: Option<ConvergenceParams>,
    },
    Schedule {
        bond: BondSpec,
    },
}

/// Result of a [`ValuationRequest`]; only the field for the operation is set
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValuationResponse {
    pub operation: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_yield_percent: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_curve: Option<SpotCurve>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_flows: Option<CashFlowSchedule>,
}

impl ValuationRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            ValuationRequest::Price { .. } => "price",
            ValuationRequest::ImpliedYield { .. } => "implied_yield",
            ValuationRequest::Bootstrap { .. } => "bootstrap",
            ValuationRequest::Schedule { .. } => "schedule",
        }
    }

    /// Run the request against `config`
    pub fn evaluate(&self, config: &ValuationConfig) -> ValuationResult<ValuationResponse> {
        let mut response = ValuationResponse {
            operation: self.operation(),
            ..Default::default()
        };

        match self {
            ValuationRequest::Price { bond, flat_yield_percent } => {
                response.price = Some(PresentValueEngine::price(bond, *flat_yield_percent)?);
            }
            ValuationRequest::ImpliedYield { bond, observed_price, convergence } => {
                let params = convergence.unwrap_or(config.yield_convergence);
                let solver = config.yield_solver().with_params(params);
                response.implied_yield_percent = Some(solver.implied_yield(*observed_price, bond)?);
            }
            ValuationRequest::Bootstrap { inputs, convergence } => {
                let params = convergence.unwrap_or(config.curve_convergence);
                let bootstrapper = config.bootstrapper().with_params(params);
                response.spot_curve = Some(bootstrapper.bootstrap_inputs(inputs)?);
            }
            ValuationRequest::Schedule { bond } => {
                response.cash_flows = Some(bond.cash_flows());
            }
        }

        Ok(response)
    }
}

/// HTTP-style status for a failed valuation
pub fn error_status(error: &ValuationError) -> u16 {
    match error {
        ValuationError::InvalidInput { .. } => 400,
        ValuationError::NonConvergence { .. } | ValuationError::NumericDegeneracy { .. } => 422,
    }
}
