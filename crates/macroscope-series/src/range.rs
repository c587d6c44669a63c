use crate::series::AlignedSeriesSet;
use crate::transform::NormalizationMode;

/// `(min, max)` for the y-axis.
pub type YRange = (f64, f64);

/// The y-axis range of `set` as it will be drawn under `mode`.
pub fn compute_y_range(set: &AlignedSeriesSet, mode: NormalizationMode) -> Option<YRange> {
    value_range(&set.transform(mode))
}

/// Padded `(min, max)` over every finite value of an already transformed set.
///
/// The pad is `max(8% of the spread, 1% of (min + max))`. A flat series at
/// or below zero gets no pad from that, so it falls back to 1% of
/// `|min + max|`, or `1.0` for a flat zero line. `None` when there is
/// nothing finite to range over; callers then leave the axis unconstrained.
pub fn value_range(set: &AlignedSeriesSet) -> Option<YRange> {
    let (min, max) = set.finite_values().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })?;

    let mut margin = f64::max((max - min) * 0.08, (min + max) * 0.01);
    if margin <= 0.0 {
        margin = (min + max).abs() * 0.01;
    }
    if margin <= 0.0 {
        margin = 1.0;
    }
    Some((min - margin, max + margin))
}
