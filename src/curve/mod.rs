//! Spot (zero-coupon) curve construction
//!
//! - [`SpotCurve`]: append-only sequence of (tenor, spot rate) points
//! - [`SpotCurveBootstrapper`]: sequential bootstrap from coupon instruments

mod bootstrap;
mod spot;

pub use bootstrap::{CurveInputs, SpotCurveBootstrapper, DIRECT_SPOT_INSTRUMENTS};
pub use spot::{SpotCurve, SpotPoint};
