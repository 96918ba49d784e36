//! Plain function-call API with default solver settings
//!
//! Rates are in percent at this boundary (5.0 means 5%); spot rates come back
//! as decimals.

use crate::bond::BondSpec;
use crate::curve::SpotCurveBootstrapper;
use crate::error::ValuationResult;
use crate::pricing::{PresentValueEngine, YieldSolver};

/// Present value of a fixed-coupon bond at a flat yield
pub fn price(
    face_value: f64,
    maturity_years: f64,
    coupon_rate_percent: f64,
    payments_per_year: u32,
    flat_yield_percent: f64,
) -> ValuationResult<f64> {
    let bond = BondSpec::new(face_value, maturity_years, coupon_rate_percent, payments_per_year)?;
    PresentValueEngine::price(&bond, flat_yield_percent)
}

/// Yield-to-maturity (percent) implied by an observed price
pub fn implied_yield(
    observed_price: f64,
    face_value: f64,
    maturity_years: f64,
    coupon_rate_percent: f64,
    payments_per_year: u32,
) -> ValuationResult<f64> {
    let bond = BondSpec::new(face_value, maturity_years, coupon_rate_percent, payments_per_year)?;
    YieldSolver::new().implied_yield(observed_price, &bond)
}

/// Spot rates (decimal), one per tenor
pub fn bootstrap_spot_curve(
    observed_price: f64,
    tenors: &[f64],
    coupon_rates_percent: &[f64],
    face_value: f64,
    payments_per_year: u32,
) -> ValuationResult<Vec<f64>> {
    SpotCurveBootstrapper::new()
        .bootstrap(observed_price, tenors, coupon_rates_percent, face_value, payments_per_year)
        .map(|curve| curve.into_spot_rates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    #[test]
    fn test_reference_fixtures() {
        let value = price(100.0, 5.0, 5.0, 12, 5.1).unwrap();
        assert!((value - 99.55948104514917).abs() < 1e-10);

        let ytm = implied_yield(value, 100.0, 5.0, 5.0, 12).unwrap();
        assert!((ytm - 5.1).abs() < 1e-8, "YTM mismatch: {}", ytm);

        let spots = bootstrap_spot_curve(100.0, &[0.5, 1.0, 1.5, 2.0], &[5.0, 5.5, 6.0, 6.5], 100.0, 2).unwrap();
        assert_eq!(spots.len(), 4);
        assert_eq!(spots[0], 0.05);
        assert_eq!(spots[1], 0.055);
    }

    #[test]
    fn test_zero_frequency_is_invalid_everywhere() {
        assert!(matches!(
            price(100.0, 5.0, 5.0, 0, 5.1),
            Err(ValuationError::InvalidInput { field: "payments_per_year", .. })
        ));
        assert!(matches!(
            implied_yield(99.0, 100.0, 5.0, 5.0, 0),
            Err(ValuationError::InvalidInput { field: "payments_per_year", .. })
        ));
        assert!(matches!(
            bootstrap_spot_curve(100.0, &[0.5, 1.0, 1.5], &[5.0, 5.5, 6.0], 100.0, 0),
            Err(ValuationError::InvalidInput { field: "payments_per_year", .. })
        ));
    }
}
