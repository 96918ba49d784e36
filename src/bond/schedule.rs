//! Cash-flow schedule generated on demand from bond terms

use serde::{Deserialize, Serialize};

use super::spec::BondSpec;

/// Kind of payment in a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowKind {
    Coupon,
    Redemption,
}

/// A single dated payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Time of payment in years from valuation
    pub time_years: f64,
    pub amount: f64,
    pub kind: CashFlowKind,
}

/// Ordered (ascending time) payments of a bond
///
/// Coupons and the redemption are kept as separate entries, redemption last,
/// even when the redemption falls on the final coupon date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashFlowSchedule {
    flows: Vec<CashFlow>,
}

impl CashFlowSchedule {
    /// Generate the schedule for a bond
    pub fn for_bond(bond: &BondSpec) -> Self {
        let frequency = bond.frequency();
        let coupon = bond.coupon_amount();
        let periods = bond.period_count();

        let mut flows = Vec::with_capacity(periods as usize + 1);
        for period in 1..=periods {
            flows.push(CashFlow {
                time_years: period as f64 / frequency,
                amount: coupon,
                kind: CashFlowKind::Coupon,
            });
        }
        flows.push(CashFlow {
            time_years: bond.maturity_years(),
            amount: bond.face_value(),
            kind: CashFlowKind::Redemption,
        });

        Self { flows }
    }

    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.flows.iter()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Undiscounted sum of all payments
    pub fn total_amount(&self) -> f64 {
        self.flows.iter().map(|cf| cf.amount).sum()
    }

    /// Present value at a flat per-period rate
    ///
    /// Each payment is discounted by `(1 + rate)^(frequency * time_years)`,
    /// so a redemption at a fractional maturity uses a fractional exponent.
    /// Callers are responsible for `1 + periodic_rate > 0`.
    pub fn discounted_at(&self, periodic_rate: f64, frequency: f64) -> f64 {
        let base = 1.0 + periodic_rate;
        let mut pv = 0.0;
        for cf in &self.flows {
            pv += cf.amount / base.powf(frequency * cf.time_years);
        }
        pv
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_layout() {
        let bond = BondSpec::new(100.0, 2.0, 6.0, 2).unwrap();
        let schedule = bond.cash_flows();

        assert_eq!(schedule.len(), 5); // 4 coupons + redemption
        let times: Vec<f64> = schedule.iter().map(|cf| cf.time_years).collect();
        assert_eq!(times, vec![0.5, 1.0, 1.5, 2.0, 2.0]);

        assert!(schedule.flows()[..4].iter().all(|cf| cf.kind == CashFlowKind::Coupon));
        assert!((schedule.flows()[0].amount - 3.0).abs() < 1e-12);

        let last = schedule.flows().last().unwrap();
        assert_eq!(last.kind, CashFlowKind::Redemption);
        assert_eq!(last.amount, 100.0);

        assert!((schedule.total_amount() - 112.0).abs() < 1e-10);
    }

    #[test]
    fn test_times_ascending() {
        let bond = BondSpec::new(1000.0, 7.25, 4.0, 4).unwrap();
        let schedule = bond.cash_flows();

        assert_eq!(schedule.len(), 30); // 29 quarterly coupons + redemption
        assert!(schedule
            .flows()
            .windows(2)
            .all(|pair| pair[0].time_years <= pair[1].time_years));
    }

    #[test]
    fn test_zero_rate_discount_is_undiscounted_sum() {
        let bond = BondSpec::new(100.0, 3.0, 4.0, 1).unwrap();
        let schedule = bond.cash_flows();

        assert!((schedule.discounted_at(0.0, 1.0) - schedule.total_amount()).abs() < 1e-12);
    }
}
