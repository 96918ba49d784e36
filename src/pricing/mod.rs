//! Flat-yield pricing and its inverse
//!
//! - [`PresentValueEngine`]: bond value at a given flat yield
//! - [`YieldSolver`]: flat yield implied by an observed price

mod present_value;
mod yield_solver;

pub use present_value::PresentValueEngine;
pub use yield_solver::YieldSolver;

pub(crate) use present_value::check_discount_base;
