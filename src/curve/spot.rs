//! Append-only spot rate curve

use serde::{Deserialize, Serialize};

/// One bootstrapped point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotPoint {
    pub tenor_years: f64,
    /// Zero-coupon rate as a decimal (0.05 = 5%)
    pub spot_rate: f64,
}

/// Spot rates in tenor order
///
/// A curve only grows: [`SpotCurve::extended`] consumes the curve and returns
/// it with one more point, so a point can never be written out of order or
/// rewritten once later points depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotCurve {
    points: Vec<SpotPoint>,
}

impl SpotCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same curve with one more point at the long end
    #[must_use]
    pub fn extended(mut self, tenor_years: f64, spot_rate: f64) -> Self {
        self.points.push(SpotPoint { tenor_years, spot_rate });
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SpotPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&SpotPoint> {
        self.points.get(index)
    }

    pub fn tenors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tenor_years).collect()
    }

    pub fn spot_rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.spot_rate).collect()
    }

    pub fn into_spot_rates(self) -> Vec<f64> {
        self.points.into_iter().map(|p| p.spot_rate).collect()
    }

    /// Discount factor for the point at `index`, treated as `index + 1` periods out
    ///
    /// Matches the bootstrap's convention of indexing periods by curve position.
    /// `None` when there is no such point or `1 + spot / frequency` is not positive.
    pub fn discount_factor(&self, index: usize, payments_per_year: u32) -> Option<f64> {
        let point = self.points.get(index)?;
        let base = 1.0 + point.spot_rate / payments_per_year as f64;
        if payments_per_year == 0 || base <= 0.0 {
            return None;
        }
        Some(1.0 / base.powf((index + 1) as f64))
    }

    /// Price of the bootstrap instrument at `index`, rebuilt from this curve
    ///
    /// Coupons for the first `index` periods are discounted at the earlier
    /// points; coupon plus face at the final period uses the point itself.
    pub fn reprice_instrument(
        &self,
        index: usize,
        coupon_rate_percent: f64,
        face_value: f64,
        payments_per_year: u32,
    ) -> Option<f64> {
        if index >= self.points.len() || payments_per_year == 0 {
            return None;
        }
        let period_coupon = (coupon_rate_percent / 100.0 * face_value) / payments_per_year as f64;

        let mut value = 0.0;
        for period in 0..index {
            value += period_coupon * self.discount_factor(period, payments_per_year)?;
        }
        value += (face_value + period_coupon) * self.discount_factor(index, payments_per_year)?;
        Some(value)
    }
}

impl<'a> IntoIterator for &'a SpotCurve {
    type Item = &'a SpotPoint;
    type IntoIter = std::slice::Iter<'a, SpotPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_grows_by_one() {
        let curve = SpotCurve::new().extended(0.5, 0.05).extended(1.0, 0.055);

        assert_eq!(curve.len(), 2);
        assert_eq!(curve.tenors(), vec![0.5, 1.0]);
        assert_eq!(curve.spot_rates(), vec![0.05, 0.055]);
        assert!(curve.get(2).is_none());
    }

    #[test]
    fn test_discount_factor() {
        let curve = SpotCurve::new().extended(0.5, 0.05).extended(1.0, 0.06);

        let df0 = curve.discount_factor(0, 2).unwrap();
        let df1 = curve.discount_factor(1, 2).unwrap();
        assert!((df0 - 1.0 / 1.025).abs() < 1e-12);
        assert!((df1 - 1.0 / 1.03_f64.powi(2)).abs() < 1e-12);
        assert!(curve.discount_factor(2, 2).is_none());
    }

    #[test]
    fn test_discount_factor_undefined_for_collapsed_base() {
        let curve = SpotCurve::new().extended(0.5, -4.0).extended(1.0, -2.0).extended(1.5, 0.05);

        assert_eq!(curve.discount_factor(0, 2), None);
        assert_eq!(curve.discount_factor(1, 2), None);
        assert!(curve.discount_factor(2, 2).is_some());
        assert_eq!(curve.discount_factor(2, 0), None);
        assert_eq!(curve.reprice_instrument(2, 5.0, 100.0, 2), None);
    }

    #[test]
    fn test_reprice_flat_curve_at_par() {
        // Flat 6% curve, 6% semiannual coupon: every instrument prices at par
        let curve = (1..=4).fold(SpotCurve::new(), |c, k| c.extended(k as f64 * 0.5, 0.06));

        for index in 0..4 {
            let price = curve.reprice_instrument(index, 6.0, 100.0, 2).unwrap();
            assert!((price - 100.0).abs() < 1e-10, "index {}: {}", index, price);
        }
        assert!(curve.reprice_instrument(4, 6.0, 100.0, 2).is_none());
    }
}
