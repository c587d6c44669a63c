use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// How a series is presented on a comparison chart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    /// Raw values, forward-filled across gaps.
    Raw,
    /// Rebased so the first finite value reads 100.
    #[default]
    Normalised,
}

impl NormalizationMode {
    pub fn apply(self, y: &[Option<f64>]) -> Vec<Option<f64>> {
        match self {
            NormalizationMode::Raw => forward_fill(y),
            NormalizationMode::Normalised => normalise(y),
        }
    }
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationMode::Raw => write!(f, "raw"),
            NormalizationMode::Normalised => write!(f, "normalised"),
        }
    }
}

fn valid(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

/// Rebase a series onto an index of 100 at its first finite value:
///
/// ```text
/// [None, -50.0, None, -25.0]  ->  [None, 100.0, 100.0, 150.0]
/// ```
///
/// Later values are `100 + (v - first) / |first| * 100`; the absolute
/// baseline keeps the direction of travel intact for negative series such as
/// sub-zero interest rates. Gaps after the baseline are forward-filled, gaps
/// before it stay `None`.
///
/// A zero baseline has no meaningful index, so such series come back
/// forward-filled in their raw units instead. Crossing zero later in the
/// series needs no special case since only the baseline is ever divided by.
///
/// The output is an index, not a price. Feed it raw values only; callers keep
/// the raw series and re-derive from it rather than normalising an output.
pub fn normalise(y: &[Option<f64>]) -> Vec<Option<f64>> {
    let Some((i0, first)) = y
        .iter()
        .enumerate()
        .find_map(|(i, v)| valid(*v).map(|v| (i, v)))
    else {
        return vec![None; y.len()];
    };

    if first == 0.0 {
        warn!("zero baseline cannot be normalised; falling back to raw values");
        return forward_fill(y);
    }

    let scale = first.abs();
    let mut last = None;
    y.iter()
        .enumerate()
        .map(|(i, v)| {
            if i < i0 {
                return None;
            }
            if i == i0 {
                last = Some(100.0);
                return last;
            }
            if let Some(v) = valid(*v) {
                let rebased = 100.0 + (v - first) / scale * 100.0;
                if rebased.is_finite() {
                    last = Some(rebased);
                }
            }
            last
        })
        .collect()
}

/// Carry the last finite value forward through gaps. Leading gaps stay `None`;
/// nothing is ever filled from later values.
pub fn forward_fill(y: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    y.iter()
        .map(|v| {
            if let Some(v) = valid(*v) {
                last = Some(v);
            }
            last
        })
        .collect()
}
