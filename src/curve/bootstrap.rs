//! Sequential spot curve bootstrap
//!
//! Instruments are processed in tenor order. The two shortest take their
//! coupon rate as the spot rate directly. Every later instrument discounts its
//! first `i` coupons at the spot rates already on the curve and root-finds only
//! the rate for its final period:
//!
//! ```text
//! sum_{j<i} c / (1 + s_j/f)^(j+1) + (face + c) / (1 + x/f)^(i+1) = price
//! ```
//!
//! Periods are counted by curve position, not by calendar tenor.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, Operation, ValuationError, ValuationResult};
use crate::pricing::check_discount_base;
use crate::solver::{ConvergenceParams, NewtonSolver, RootFinder};
use super::spot::SpotCurve;

/// Number of leading instruments whose coupon rate is taken as the spot rate
pub const DIRECT_SPOT_INSTRUMENTS: usize = 2;

/// Inputs for one bootstrap run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveInputs {
    /// Price every instrument is assumed to trade at
    pub observed_price: f64,

    /// Instrument tenors in years, strictly ascending
    pub tenors: Vec<f64>,

    /// Coupon rates in percent, aligned with `tenors`
    pub coupon_rates_percent: Vec<f64>,

    pub face_value: f64,

    pub payments_per_year: u32,
}

/// Builds a [`SpotCurve`] one tenor at a time
#[derive(Debug, Clone)]
pub struct SpotCurveBootstrapper<R = NewtonSolver> {
    root_finder: R,
    params: ConvergenceParams,
}

impl SpotCurveBootstrapper<NewtonSolver> {
    pub fn new() -> Self {
        Self::with_root_finder(NewtonSolver::default())
    }
}

impl Default for SpotCurveBootstrapper<NewtonSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RootFinder> SpotCurveBootstrapper<R> {
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

    pub fn params(&self) -> &ConvergenceParams {
        &self.params
    }

    /// Bootstrap spot rates (decimal) for each tenor
    ///
    /// All inputs are validated before any solve. A failed solve aborts the
    /// whole run with the index of the instrument that broke the curve.
    pub fn bootstrap(
        &self,
        observed_price: f64,
        tenors: &[f64],
        coupon_rates_percent: &[f64],
        face_value: f64,
        payments_per_year: u32,
    ) -> ValuationResult<SpotCurve> {
        validate_inputs(observed_price, tenors, coupon_rates_percent, face_value, payments_per_year)?;

        let mut curve = SpotCurve::new();
        for (index, (&tenor, &coupon_rate)) in tenors.iter().zip(coupon_rates_percent).enumerate() {
            check_period_alignment(index, tenor, payments_per_year);

            let spot_rate = if index < DIRECT_SPOT_INSTRUMENTS {
                coupon_rate / 100.0
            } else {
                self.solve_final_period(&curve, observed_price, coupon_rate, face_value, payments_per_year)?
            };

            check_discount_base(spot_rate / payments_per_year as f64)?;

            debug!("bootstrapped tenor {} ({}y): spot rate {}", index, tenor, spot_rate);
            curve = curve.extended(tenor, spot_rate);
        }

        Ok(curve)
    }

    /// Bootstrap from a bundled set of inputs
    pub fn bootstrap_inputs(&self, inputs: &CurveInputs) -> ValuationResult<SpotCurve> {
        self.bootstrap(
            inputs.observed_price,
            &inputs.tenors,
            &inputs.coupon_rates_percent,
            inputs.face_value,
            inputs.payments_per_year,
        )
    }

    /// Solve the spot rate for the instrument just past the end of `curve`
    fn solve_final_period(
        &self,
        curve: &SpotCurve,
        observed_price: f64,
        coupon_rate_percent: f64,
        face_value: f64,
        payments_per_year: u32,
    ) -> ValuationResult<f64> {
        let index = curve.len();
        let frequency = payments_per_year as f64;
        let period_coupon = (coupon_rate_percent / 100.0 * face_value) / frequency;

        // Coupons before the final period, at already-solved rates
        let mut known_value = 0.0;
        for (period, point) in curve.points().iter().enumerate() {
            let periodic_rate = point.spot_rate / frequency;
            check_discount_base(periodic_rate)?;
            known_value += period_coupon / (1.0 + periodic_rate).powf((period + 1) as f64);
        }

        let final_amount = face_value + period_coupon;
        let final_exponent = (index + 1) as f64;
        let objective = |rate: f64| {
            let base = 1.0 + rate / frequency;
            if base <= 0.0 {
                return f64::NAN;
            }
            known_value + final_amount / base.powf(final_exponent) - observed_price
        };

        let solution = self
            .root_finder
            .find_root(&objective, &self.params)
            .map_err(|source| ValuationError::NonConvergence {
                operation: Operation::Bootstrap,
                tenor_index: Some(index),
                source,
            })?;

        Ok(solution.root)
    }
}

fn validate_inputs(
    observed_price: f64,
    tenors: &[f64],
    coupon_rates_percent: &[f64],
    face_value: f64,
    payments_per_year: u32,
) -> ValuationResult<()> {
    if payments_per_year == 0 {
        return Err(ValuationError::invalid_input("payments_per_year", "must be at least 1"));
    }
    ensure_positive("face_value", face_value)?;
    ensure_finite("observed_price", observed_price)?;

    if tenors.len() != coupon_rates_percent.len() {
        return Err(ValuationError::invalid_input(
            "coupon_rates_percent",
            format!("{} coupon rates for {} tenors", coupon_rates_percent.len(), tenors.len()),
        ));
    }

    for &tenor in tenors {
        ensure_positive("tenors", tenor)?;
    }
    if let Some(pair) = tenors.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(ValuationError::invalid_input(
            "tenors",
            format!("must be strictly ascending, found {} then {}", pair[0], pair[1]),
        ));
    }

    for &rate in coupon_rates_percent {
        ensure_finite("coupon_rates_percent", rate)?;
    }
    Ok(())
}

/// The model assumes instrument `i` matures after `i + 1` periods; say so when it doesn't
fn check_period_alignment(index: usize, tenor: f64, payments_per_year: u32) {
    let periods = tenor * payments_per_year as f64;
    if (periods - (index + 1) as f64).abs() > 1e-9 {
        warn!(
            "tenor {} ({}y) spans {} periods but is discounted as {} periods",
            index,
            tenor,
            periods,
            index + 1
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{BisectionSolver, Solution, SolverResult};
    use approx::assert_abs_diff_eq;

    const TENORS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];
    const COUPONS: [f64; 4] = [5.0, 5.5, 6.0, 6.5];

    #[test]
    fn test_semiannual_reference_curve() {
        let curve = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap();

        assert_eq!(curve.len(), 4);
        assert_eq!(curve.tenors(), TENORS.to_vec());

        let rates = curve.spot_rates();
        assert_abs_diff_eq!(rates[2], 0.060203908059338125, epsilon = 1e-9);
        assert_abs_diff_eq!(rates[3], 0.06541754507018738, epsilon = 1e-9);
    }

    #[test]
    fn test_first_two_rates_are_coupons() {
        let curve = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap();

        // Exact equality: no solve happens for these points
        assert_eq!(curve.points()[0].spot_rate, 5.0 / 100.0);
        assert_eq!(curve.points()[1].spot_rate, 5.5 / 100.0);
    }

    #[test]
    fn test_curve_reprices_instruments() {
        let tenors = [1.0, 2.0, 3.0, 4.0, 5.0];
        let coupons = [4.0, 4.5, 5.0, 5.25, 5.5];
        let observed_price = 100.0;

        let curve = SpotCurveBootstrapper::new()
            .bootstrap(observed_price, &tenors, &coupons, 100.0, 1)
            .unwrap();

        for index in 2..tenors.len() {
            let price = curve.reprice_instrument(index, coupons[index], 100.0, 1).unwrap();
            assert!(
                (price - observed_price).abs() < 1e-6,
                "instrument {} reprices to {}",
                index,
                price
            );
        }
        assert_abs_diff_eq!(curve.spot_rates()[4], 0.05569918217997136, epsilon = 1e-9);
    }

    #[test]
    fn test_short_inputs_need_no_solver() {
        // A root finder that must never be called
        let forbidden = |_objective: &dyn Fn(f64) -> f64, _params: &ConvergenceParams| -> SolverResult<Solution> {
            panic!("no solve expected for the first two instruments")
        };

        let curve = SpotCurveBootstrapper::with_root_finder(forbidden)
            .bootstrap(100.0, &[0.5, 1.0], &[3.0, 3.5], 100.0, 2)
            .unwrap();
        assert_eq!(curve.spot_rates(), vec![0.03, 0.035]);

        let empty = SpotCurveBootstrapper::new().bootstrap(100.0, &[], &[], 100.0, 2).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_failure_names_tenor_index() {
        let err = SpotCurveBootstrapper::new()
            .bootstrap(-50.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap_err();

        assert!(matches!(err, ValuationError::NonConvergence { operation: Operation::Bootstrap, .. }));
        assert_eq!(err.tenor_index(), Some(2));
    }

    #[test]
    fn test_failure_at_later_tenor() {
        // Fails only on the fourth instrument
        let fails_late = |objective: &dyn Fn(f64) -> f64, params: &ConvergenceParams| -> SolverResult<Solution> {
            if objective(0.0) > 10.0 {
                return Err(crate::solver::SolverError::IterationLimit { iterations: 0, last_step: 0.0 });
            }
            NewtonSolver::default().find_root(objective, params)
        };

        // At a zero final rate the third instrument overshoots the price by about 8.8,
        // the fourth by about 12.5
        let err = SpotCurveBootstrapper::with_root_finder(fails_late)
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap_err();
        assert_eq!(err.tenor_index(), Some(3));
    }

    #[test]
    fn test_non_positive_discount_base_on_short_curve() {
        // -400% semiannual is a -200% periodic rate
        let err = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &[0.5, 1.0], &[-400.0, 5.0], 100.0, 2)
            .unwrap_err();
        assert!(matches!(err, ValuationError::NumericDegeneracy { .. }));

        // Exactly -100% periodic is rejected too
        let err = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &[0.5, 1.0], &[5.0, -200.0], 100.0, 2)
            .unwrap_err();
        assert!(matches!(err, ValuationError::NumericDegeneracy { .. }));
    }

    #[test]
    fn test_non_positive_discount_base_on_long_curve() {
        let err = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &TENORS, &[-400.0, 5.5, 6.0, 6.5], 100.0, 2)
            .unwrap_err();
        assert!(matches!(err, ValuationError::NumericDegeneracy { .. }));

        // A solved rate with a collapsed discount base is rejected as well
        let collapsed = |_objective: &dyn Fn(f64) -> f64, _params: &ConvergenceParams| -> SolverResult<Solution> {
            Ok(Solution { root: -3.0, iterations: 1, residual: 0.0 })
        };
        let err = SpotCurveBootstrapper::with_root_finder(collapsed)
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap_err();
        assert!(matches!(err, ValuationError::NumericDegeneracy { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let bootstrapper = SpotCurveBootstrapper::new();

        let zero_frequency = bootstrapper.bootstrap(100.0, &TENORS, &COUPONS, 100.0, 0);
        assert!(zero_frequency.unwrap_err().is_invalid_input());

        let mismatched = bootstrapper.bootstrap(100.0, &TENORS, &COUPONS[..3], 100.0, 2);
        assert!(mismatched.unwrap_err().is_invalid_input());

        let unordered = bootstrapper.bootstrap(100.0, &[0.5, 1.5, 1.0, 2.0], &COUPONS, 100.0, 2);
        assert!(unordered.unwrap_err().is_invalid_input());

        let repeated = bootstrapper.bootstrap(100.0, &[0.5, 1.0, 1.0, 2.0], &COUPONS, 100.0, 2);
        assert!(repeated.unwrap_err().is_invalid_input());

        let negative_face = bootstrapper.bootstrap(100.0, &TENORS, &COUPONS, -100.0, 2);
        assert!(negative_face.unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_bisection_matches_newton() {
        let params = ConvergenceParams::default().with_max_iterations(200);
        let bisection = SpotCurveBootstrapper::with_root_finder(BisectionSolver::new(-0.5, 1.0))
            .with_params(params)
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap();
        let newton = SpotCurveBootstrapper::new()
            .bootstrap(100.0, &TENORS, &COUPONS, 100.0, 2)
            .unwrap();

        for (a, b) in bisection.spot_rates().iter().zip(newton.spot_rates()) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_bootstrap_inputs() {
        let inputs = CurveInputs {
            observed_price: 100.0,
            tenors: TENORS.to_vec(),
            coupon_rates_percent: COUPONS.to_vec(),
            face_value: 100.0,
            payments_per_year: 2,
        };

        let curve = SpotCurveBootstrapper::new().bootstrap_inputs(&inputs).unwrap();
        assert_eq!(curve.len(), 4);
    }
}
