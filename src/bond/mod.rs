//! Bond terms and the cash-flow schedules derived from them

mod schedule;
mod spec;

pub use schedule::{CashFlow, CashFlowKind, CashFlowSchedule};
pub use spec::{BondSpec, BondTerms, MAX_PERIODS};
