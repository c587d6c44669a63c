use crate::transform::NormalizationMode;
use serde::{Deserialize, Serialize};

/// A single observation. `y` is `None` where the source had no usable value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Point {
    pub x: String,
    pub y: Option<f64>,
}

/// A named, raw series as it arrives from the backend: ordered by `x`, but
/// possibly sparse, irregular, or starting later than its neighbours.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_pairs<I, X>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (X, Option<f64>)>,
        X: Into<String>,
    {
        let points = pairs
            .into_iter()
            .map(|(x, y)| Point { x: x.into(), y })
            .collect();
        Self {
            name: name.into(),
            points,
            ..Default::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn push(&mut self, x: impl Into<String>, y: Option<f64>) {
        self.points.push(Point { x: x.into(), y });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.x.as_str())
    }
}

/// One series after alignment: `y[i]` belongs to `AlignedSeriesSet::x[i]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub y: Vec<Option<f64>>,
}

impl AlignedSeries {
    /// Number of finite values.
    pub fn valid_points(&self) -> usize {
        self.y
            .iter()
            .filter(|v| v.is_some_and(|v| v.is_finite()))
            .count()
    }

    /// `false` when the series had no overlap with the x-domain at all.
    pub fn has_data(&self) -> bool {
        self.valid_points() > 0
    }
}

/// A shared x-axis and the series laid over it.
///
/// Invariant: every `series[i].y.len() == x.len()`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AlignedSeriesSet {
    pub x: Vec<String>,
    pub series: Vec<AlignedSeries>,
}

impl AlignedSeriesSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AlignedSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// A copy holding only series with at least `min_points` finite values.
    pub fn retain_plottable(&self, min_points: usize) -> Self {
        let series = self
            .series
            .iter()
            .filter(|s| {
                let keep = s.valid_points() >= min_points;
                if !keep {
                    tracing::debug!(
                        "dropping {} from chart: {} valid points (< {min_points})",
                        s.name,
                        s.valid_points()
                    );
                }
                keep
            })
            .cloned()
            .collect();
        Self {
            x: self.x.clone(),
            series,
        }
    }

    /// A new set with every series passed through `mode`'s transform; `self`
    /// is left untouched so the raw set can feed several views.
    pub fn transform(&self, mode: NormalizationMode) -> Self {
        let series = self
            .series
            .iter()
            .map(|s| AlignedSeries {
                y: mode.apply(&s.y),
                ..s.clone()
            })
            .collect();
        Self {
            x: self.x.clone(),
            series,
        }
    }

    /// All finite values across all series.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.y.iter())
            .filter_map(|v| *v)
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> AlignedSeriesSet {
        AlignedSeriesSet {
            x: vec!["2024-01-01".into(), "2024-01-02".into(), "2024-01-03".into()],
            series: vec![
                AlignedSeries {
                    name: "sparse".into(),
                    unit: None,
                    color: None,
                    y: vec![None, Some(2.0), None],
                },
                AlignedSeries {
                    name: "dense".into(),
                    unit: Some("%".into()),
                    color: Some("#1976d2".into()),
                    y: vec![Some(1.0), Some(f64::NAN), Some(3.0)],
                },
            ],
        }
    }

    #[test]
    fn valid_points_ignore_nan() {
        let set = set();
        assert_eq!(set.get("sparse").map(AlignedSeries::valid_points), Some(1));
        assert_eq!(set.get("dense").map(AlignedSeries::valid_points), Some(2));
    }

    #[test]
    fn retain_plottable_drops_thin_series() {
        let kept = set().retain_plottable(2);
        assert_eq!(kept.series.len(), 1);
        assert_eq!(kept.series[0].name, "dense");
        assert_eq!(kept.x.len(), 3);
    }

    /// `NaN` never equals itself, so compare the bits.
    fn same_bits(a: &AlignedSeriesSet, b: &AlignedSeriesSet) -> bool {
        let bits = |set: &AlignedSeriesSet| -> Vec<Vec<Option<u64>>> {
            set.series
                .iter()
                .map(|s| s.y.iter().map(|y| y.map(f64::to_bits)).collect())
                .collect()
        };
        a.x == b.x && bits(a) == bits(b)
    }

    #[test]
    fn transform_leaves_input_untouched() {
        let raw = set();
        let normalised = raw.transform(NormalizationMode::Normalised);
        let filled = raw.transform(NormalizationMode::Raw);
        assert!(same_bits(&raw, &set()));
        assert_eq!(filled.series[0].y, vec![None, Some(2.0), Some(2.0)]);
        assert_eq!(normalised.series[1].y, vec![Some(100.0), Some(100.0), Some(300.0)]);
        assert_eq!(normalised.series[1].unit.as_deref(), Some("%"));
    }

    #[test]
    fn finite_values_flatten_all_series() {
        let mut values: Vec<f64> = set().finite_values().collect();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_pairs_keeps_order() {
        let s = Series::from_pairs("gold", [("2024-01-02", Some(1.0)), ("2024-01-01", None)])
            .with_unit("$");
        assert_eq!(s.xs().collect::<Vec<_>>(), vec!["2024-01-02", "2024-01-01"]);
        assert_eq!(s.unit.as_deref(), Some("$"));
    }
}
