//! Chart-ready time series: alignment onto a shared date axis, gap filling,
//! baseline normalisation, y-axis ranges and adaptive axis ticks.
//!
//! Everything in this crate is pure. Malformed input (empty slices, `NaN`,
//! unparseable dates) degrades to `None` or empty output instead of failing.

pub mod align;
pub mod domain;
pub mod frame;
pub mod range;
pub mod series;
pub mod ticks;
pub mod transform;

pub use align::{align, truncate_to_common_tail};
pub use domain::{date_key, padded_bounds, parse_date_key, trailing_days, trailing_months};
pub use frame::ChartFrame;
pub use range::{compute_y_range, value_range, YRange};
pub use series::{AlignedSeries, AlignedSeriesSet, Point, Series};
pub use ticks::{generate_ticks, TickGranularity, TickSet};
pub use transform::{forward_fill, normalise, NormalizationMode};
