#![warn(missing_docs)]

//! Design parameters for waveshelf.
//!
//! Physical units, per-axis rib scaling, the [`ShelfParams`] snapshot and the
//! [`ShelfConfig`] file format. All types are plain values; updates return new
//! snapshots.

pub mod axis;
pub mod backplane;
pub mod config;
pub mod error;
pub mod shelf;
pub mod units;

pub use axis::AxisScale;
pub use backplane::{BackplaneParams, BackplaneShape, SlotStyle};
pub use config::ShelfConfig;
pub use error::{ParamsError, Result};
pub use shelf::{Axis, RibShape, ShelfParams};
pub use units::{to_mm, to_physical, PhysicalLength, Unit, MM_PER_INCH};
