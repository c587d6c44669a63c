use crate::series::{AlignedSeries, AlignedSeriesSet, Series};
use std::collections::HashMap;
use tracing::trace;

/// Lay every series over a caller-supplied x-domain.
///
/// Each output `y` has exactly `x_domain.len()` entries in domain order:
/// the series' value at that key, or `None` when it has none. Non-finite
/// source values count as absent. When a key occurs more than once in a
/// series the later point wins.
///
/// A series without a single overlapping key comes back all-`None`; see
/// [`AlignedSeries::has_data`].
pub fn align(raw: &[Series], x_domain: &[String]) -> AlignedSeriesSet {
    let series = raw.iter().map(|s| align_one(s, x_domain)).collect();
    AlignedSeriesSet {
        x: x_domain.to_vec(),
        series,
    }
}

fn align_one(series: &Series, x_domain: &[String]) -> AlignedSeries {
    let lookup: HashMap<&str, Option<f64>> = series
        .points
        .iter()
        .map(|p| (p.x.as_str(), p.y.filter(|v| v.is_finite())))
        .collect();

    let y: Vec<Option<f64>> = x_domain
        .iter()
        .map(|x| lookup.get(x.as_str()).copied().flatten())
        .collect();

    if y.iter().all(Option::is_none) {
        trace!("{} has no data inside the x-domain", series.name);
    }

    AlignedSeries {
        name: series.name.clone(),
        unit: series.unit.clone(),
        color: series.color.clone(),
        y,
    }
}

/// Cut every series down to the length of the shortest, keeping the most
/// recent points. Used when two histories are compared point-for-point
/// rather than on a calendar axis.
pub fn truncate_to_common_tail(raw: &[Series]) -> Vec<Series> {
    let Some(min_len) = raw.iter().map(Series::len).min() else {
        return Vec::new();
    };
    raw.iter()
        .map(|s| Series {
            points: s.points[s.len() - min_len..].to_vec(),
            ..s.clone()
        })
        .collect()
}
