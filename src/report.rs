//! CSV output for spot curves and cash-flow schedules

use std::io::Write;

use serde::Serialize;

use crate::bond::{CashFlowKind, CashFlowSchedule};
use crate::curve::SpotCurve;

#[derive(Serialize)]
struct CurveRow {
    #[serde(rename = "Index")]
    index: usize,
    #[serde(rename = "TenorYears")]
    tenor_years: f64,
    #[serde(rename = "SpotRate")]
    spot_rate: f64,
    #[serde(rename = "DiscountFactor")]
    discount_factor: f64,
}

#[derive(Serialize)]
struct ScheduleRow {
    #[serde(rename = "Period")]
    period: usize,
    #[serde(rename = "TimeYears")]
    time_years: f64,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Kind")]
    kind: CashFlowKind,
}

/// Write one row per curve point, with its period discount factor
pub fn write_curve_csv<W: Write>(
    curve: &SpotCurve,
    payments_per_year: u32,
    writer: W,
) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (index, point) in curve.points().iter().enumerate() {
        csv_writer.serialize(CurveRow {
            index,
            tenor_years: point.tenor_years,
            spot_rate: point.spot_rate,
            discount_factor: curve.discount_factor(index, payments_per_year).unwrap_or(f64::NAN),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write one row per cash flow; the redemption shares the final period number
pub fn write_schedule_csv<W: Write>(schedule: &CashFlowSchedule, writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut period = 0;
    for cf in schedule {
        if cf.kind == CashFlowKind::Coupon {
            period += 1;
        }
        csv_writer.serialize(ScheduleRow {
            period,
            time_years: cf.time_years,
            amount: cf.amount,
            kind: cf.kind,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
