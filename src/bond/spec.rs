//! Fixed-coupon bond terms

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, ValuationError, ValuationResult};
use super::schedule::CashFlowSchedule;

/// Upper bound on `maturity_years * payments_per_year`
///
/// Keeps the period count exact in a `u32` and bounds the size of a generated schedule.
pub const MAX_PERIODS: f64 = 100_000.0;

/// Raw bond terms as they arrive from a caller, before validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Redemption amount paid at maturity
    pub face_value: f64,

    /// Annual coupon rate in percent (5.0 = 5%)
    pub annual_coupon_rate_percent: f64,

    /// Coupon payments per year
    pub payments_per_year: u32,

    /// Years to maturity
    pub maturity_years: f64,
}

/// A validated fixed-coupon bond
///
/// Pays `(coupon% / frequency) * face / 100` at the end of each of
/// `trunc(maturity * frequency)` periods and redeems `face` at maturity.
/// Fractional trailing periods are dropped from the coupon stream; the
/// redemption is still discounted over the full, untruncated maturity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BondTerms")]
pub struct BondSpec {
    face_value: f64,
    annual_coupon_rate_percent: f64,
    payments_per_year: u32,
    maturity_years: f64,
}

impl BondSpec {
    /// Validate and build a bond
    pub fn new(
        face_value: f64,
        maturity_years: f64,
        annual_coupon_rate_percent: f64,
        payments_per_year: u32,
    ) -> ValuationResult<Self> {
        if payments_per_year == 0 {
            return Err(ValuationError::invalid_input(
                "payments_per_year",
                "must be at least 1",
            ));
        }
        let face_value = ensure_positive("face_value", face_value)?;
        let maturity_years = ensure_positive("maturity_years", maturity_years)?;
        let annual_coupon_rate_percent =
            ensure_finite("annual_coupon_rate_percent", annual_coupon_rate_percent)?;

        let periods = maturity_years * payments_per_year as f64;
        if periods > MAX_PERIODS {
            return Err(ValuationError::invalid_input(
                "maturity_years",
                format!(
                    "{} years at {} payments per year is {} periods, more than {}",
                    maturity_years, payments_per_year, periods, MAX_PERIODS
                ),
            ));
        }

        Ok(Self {
            face_value,
            annual_coupon_rate_percent,
            payments_per_year,
            maturity_years,
        })
    }

    pub fn face_value(&self) -> f64 {
        self.face_value
    }

    pub fn annual_coupon_rate_percent(&self) -> f64 {
        self.annual_coupon_rate_percent
    }

    pub fn payments_per_year(&self) -> u32 {
        self.payments_per_year
    }

    pub fn maturity_years(&self) -> f64 {
        self.maturity_years
    }

    pub fn frequency(&self) -> f64 {
        self.payments_per_year as f64
    }

    /// Number of coupon periods, truncated toward zero
    pub fn period_count(&self) -> u32 {
        (self.maturity_years * self.frequency()) as u32
    }

    /// Coupon paid each period
    pub fn coupon_amount(&self) -> f64 {
        ((self.annual_coupon_rate_percent / self.frequency()) * self.face_value) / 100.0
    }

    /// Per-period discount rate (decimal) for an annual flat yield in percent
    pub fn periodic_rate(&self, flat_yield_percent: f64) -> f64 {
        flat_yield_percent / 100.0 / self.frequency()
    }

    /// Ordered cash flows: every coupon, then the redemption
    pub fn cash_flows(&self) -> CashFlowSchedule {
        CashFlowSchedule::for_bond(self)
    }

    pub fn terms(&self) -> BondTerms {
        BondTerms {
            face_value: self.face_value,
            annual_coupon_rate_percent: self.annual_coupon_rate_percent,
            payments_per_year: self.payments_per_year,
            maturity_years: self.maturity_years,
        }
    }
}

impl TryFrom<BondTerms> for BondSpec {
    type Error = ValuationError;

    fn try_from(terms: BondTerms) -> Result<Self, Self::Error> {
        BondSpec::new(
            terms.face_value,
            terms.maturity_years,
            terms.annual_coupon_rate_percent,
            terms.payments_per_year,
        )
    }
}
