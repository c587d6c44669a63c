use crate::align::align;
use crate::domain::padded_bounds;
use crate::range::{value_range, YRange};
use crate::series::{AlignedSeries, Series};
use crate::ticks::{generate_ticks, TickSet};
use crate::transform::NormalizationMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A line needs two points.
pub const MIN_PLOTTABLE_POINTS: usize = 2;

/// Days of breathing room either side of the x-axis.
pub const X_PAD_DAYS: u64 = 3;

/// Everything a charting library needs to draw one comparison chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub mode: NormalizationMode,
    pub x: Vec<String>,
    pub series: Vec<AlignedSeries>,
    pub ticks: TickSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<YRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_bounds: Option<(String, String)>,
}

impl ChartFrame {
    /// Align `raw` onto `x_domain`, drop series too thin to draw, apply
    /// `mode`, and derive ticks for a chart `pixel_width` wide plus the
    /// y-range of what is left.
    pub fn build(
        raw: &[Series],
        x_domain: &[String],
        mode: NormalizationMode,
        pixel_width: f64,
    ) -> Self {
        let aligned = align(raw, x_domain).retain_plottable(MIN_PLOTTABLE_POINTS);
        let shown = aligned.transform(mode);
        let y_range = value_range(&shown);
        debug!(
            "chart frame: {} of {} series over {} keys ({mode})",
            shown.series.len(),
            raw.len(),
            shown.x.len()
        );

        Self {
            mode,
            ticks: generate_ticks(&shown.x, pixel_width),
            x_bounds: padded_bounds(&shown.x, X_PAD_DAYS),
            y_range,
            x: shown.x,
            series: shown.series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Vec<String> {
        (1..=5).map(|d| format!("2024-01-0{d}")).collect()
    }

    #[test]
    fn build_drops_thin_series_and_ranges_the_rest() {
        let a = Series::from_pairs("a", [("2024-01-02", Some(10.0)), ("2024-01-04", Some(12.0))]);
        let b = Series::from_pairs("b", [("2024-01-03", Some(5.0))]);
        let frame = ChartFrame::build(&[a, b], &domain(), NormalizationMode::Normalised, 800.0);

        assert_eq!(frame.series.len(), 1);
        assert_eq!(
            frame.series[0].y,
            vec![None, Some(100.0), Some(100.0), Some(120.0), Some(120.0)]
        );
        let (lo, hi) = frame.y_range.expect("range");
        assert!(lo < 100.0 && hi > 120.0);
        assert_eq!(
            frame.x_bounds,
            Some(("2023-12-29".to_string(), "2024-01-08".to_string()))
        );
        assert_eq!(frame.ticks.tick_labels, vec!["January"]);
    }

    #[test]
    fn empty_frame_has_no_range() {
        let frame = ChartFrame::build(&[], &domain(), NormalizationMode::Raw, 800.0);
        assert!(frame.is_empty());
        assert_eq!(frame.y_range, None);
        assert_eq!(frame.x.len(), 5);
    }

    #[test]
    fn serializes_for_the_renderer() {
        let a = Series::from_pairs("a", [("2024-01-01", Some(1.0)), ("2024-01-05", Some(2.0))]);
        let frame = ChartFrame::build(&[a], &domain(), NormalizationMode::Raw, 800.0);
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(json["mode"], "raw");
        assert_eq!(json["ticks"]["granularity"], "monthly");
        assert_eq!(json["series"][0]["y"][1], 1.0);
        assert!(json["y_range"].is_array());
    }
}
