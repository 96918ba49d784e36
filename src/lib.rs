//! Bond Valuation - fixed-coupon bond pricing and spot curve construction
//!
//! This library provides:
//! - Present value of a bond at a flat yield
//! - Yield-to-maturity recovered from an observed price
//! - Sequential bootstrap of zero-coupon (spot) rates from coupon instruments
//! - Pluggable root finders, batch valuation, CSV reports
//!
//! Rates are quoted in percent at the API boundary. Logging goes through the
//! `log` facade; nothing is emitted unless the caller installs a logger.

pub mod api;
pub mod bond;
pub mod config;
pub mod curve;
pub mod error;
pub mod pricing;
pub mod report;
pub mod request;
pub mod scenario;
pub mod solver;

// Re-export commonly used types
pub use api::{bootstrap_spot_curve, implied_yield, price};
pub use bond::{BondSpec, CashFlow, CashFlowSchedule};
pub use config::ValuationConfig;
pub use curve::{CurveInputs, SpotCurve, SpotCurveBootstrapper};
pub use error::{Operation, ValuationError, ValuationResult};
pub use pricing::{PresentValueEngine, YieldSolver};
pub use scenario::ScenarioRunner;
pub use solver::{ConvergenceParams, NewtonSolver, RootFinder};
