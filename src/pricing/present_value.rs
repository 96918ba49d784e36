//! Flat-yield present value of a bond

use log::debug;

use crate::bond::{BondSpec, CashFlowSchedule};
use crate::error::{ensure_finite, ValuationError, ValuationResult};

/// Discounts bond cash flows at a single flat yield
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueEngine;

impl PresentValueEngine {
    /// Present value ("mark-to-market") of a bond at an annual flat yield in percent
    ///
    /// Negative yields are accepted as long as the per-period discount base
    /// `1 + yield / 100 / frequency` stays positive.
    pub fn price(bond: &BondSpec, flat_yield_percent: f64) -> ValuationResult<f64> {
        let flat_yield_percent = ensure_finite("flat_yield_percent", flat_yield_percent)?;
        debug!(
            "pricing bond: face={} maturity={} coupon={}% frequency={} yield={}%",
            bond.face_value(),
            bond.maturity_years(),
            bond.annual_coupon_rate_percent(),
            bond.payments_per_year(),
            flat_yield_percent
        );

        let periodic_rate = bond.periodic_rate(flat_yield_percent);
        let value = Self::price_schedule(&bond.cash_flows(), periodic_rate, bond.frequency())?;

        debug!("priced bond at {}%: value={:.6}", flat_yield_percent, value);
        Ok(value)
    }

    /// Present value of an existing schedule at a per-period rate (decimal)
    pub fn price_schedule(
        schedule: &CashFlowSchedule,
        periodic_rate: f64,
        frequency: f64,
    ) -> ValuationResult<f64> {
        check_discount_base(periodic_rate)?;

        let value = schedule.discounted_at(periodic_rate, frequency);
        if !value.is_finite() {
            return Err(ValuationError::degenerate(format!(
                "present value is not finite at periodic rate {}",
                periodic_rate
            )));
        }
        Ok(value)
    }
}

/// `1 + periodic_rate` must stay strictly positive for discounting to be defined
pub(crate) fn check_discount_base(periodic_rate: f64) -> ValuationResult<()> {
    if 1.0 + periodic_rate <= 0.0 {
        return Err(ValuationError::degenerate(format!(
            "discount base 1 + {} is not positive",
            periodic_rate
        )));
    }
    Ok(())
}
