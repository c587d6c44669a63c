//! One [`ChartFrame`] per dashboard view, built from what the backend sent.

use crate::bonds::Bond;
use crate::schema::{bond_series, history_series, yearly_series, BondPoint};
use chrono::NaiveDate;
use macroscope_series::{
    trailing_months, truncate_to_common_tail, ChartFrame, NormalizationMode, Series,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Index lines on the US market chart, with their colours.
pub const US_INDICES: [(&str, &str); 3] = [
    ("NASDAQ", "#1976d2"),
    ("S&P 500", "#43a047"),
    ("Dow Jones", "#fbc02d"),
];

pub const MACRO_COUNTRIES: [&str; 6] = [
    "United States",
    "Germany",
    "France",
    "United Kingdom",
    "Japan",
    "China",
];

const MACRO_COLOR: &str = "#1976d2";

/// Interest rate history before this year is too patchy to chart.
const INTEREST_RATE_FROM_YEAR: i32 = 2000;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacroIndicator {
    #[default]
    Inflation,
    Unemployment,
    GdpGrowth,
    InterestRate,
    GovernmentDebt,
}

impl MacroIndicator {
    pub const ALL: [MacroIndicator; 5] = [
        MacroIndicator::Inflation,
        MacroIndicator::Unemployment,
        MacroIndicator::GdpGrowth,
        MacroIndicator::InterestRate,
        MacroIndicator::GovernmentDebt,
    ];

    /// Field of a country's macro payload holding this indicator.
    pub fn key(self) -> &'static str {
        match self {
            MacroIndicator::Inflation => "inflation",
            MacroIndicator::Unemployment => "unemployment",
            MacroIndicator::GdpGrowth => "gdp_growth",
            MacroIndicator::InterestRate => "interest_rate",
            MacroIndicator::GovernmentDebt => "government_debt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MacroIndicator::Inflation => "CPI",
            MacroIndicator::Unemployment => "Unemployment Rate",
            MacroIndicator::GdpGrowth => "GDP Growth",
            MacroIndicator::InterestRate => "Interest Rate",
            MacroIndicator::GovernmentDebt => "Government Debt (as % of GDP)",
        }
    }

    fn from_year(self) -> Option<i32> {
        match self {
            MacroIndicator::InterestRate => Some(INTEREST_RATE_FROM_YEAR),
            _ => None,
        }
    }
}

impl fmt::Display for MacroIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MacroIndicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', ' '], "_");
        MacroIndicator::ALL
            .into_iter()
            .find(|i| i.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown macro indicator {s:?}"))
    }
}

//////////////////////////////////////////////////////////////////////////////////////

fn plottable(series: &Series, min_points: usize) -> bool {
    series.points.iter().filter(|p| p.y.is_some()).count() >= min_points
}

/// Major US indices over the `months` before `today`, one key per day.
pub fn market_frame(
    payload: &Value,
    today: NaiveDate,
    months: u32,
    mode: NormalizationMode,
    width: f64,
) -> ChartFrame {
    let series: Vec<Series> = US_INDICES
        .iter()
        .filter_map(|&(name, color)| match history_series(payload, "indices", name) {
            Some(series) => Some(series.with_color(color)),
            None => {
                warn!("No history for index {name:?}");
                None
            }
        })
        .collect();

    ChartFrame::build(&series, &trailing_months(today, months), mode, width)
}

/// Commodity prices compared over their common most-recent stretch.
///
/// `names` picks commodities; empty means every commodity in the payload.
/// Histories with fewer than two usable prices are left out before the
/// others are cut to a common length, so one dead feed can't blank the
/// chart. The x-axis is the dates of the first remaining series.
pub fn commodity_frame(
    payload: &Value,
    names: &[String],
    mode: NormalizationMode,
    width: f64,
) -> ChartFrame {
    const GROUP: &str = "commodities";

    let wanted: Vec<String> = if names.is_empty() {
        match payload.get(GROUP).and_then(Value::as_object) {
            Some(map) => map.keys().cloned().collect(),
            None => Vec::new(),
        }
    } else {
        names.to_vec()
    };

    let series: Vec<Series> = wanted
        .iter()
        .filter_map(|name| match history_series(payload, GROUP, name) {
            Some(series) if plottable(&series, 2) => Some(series),
            Some(_) => {
                debug!("Commodity {name:?} has too little history to chart");
                None
            }
            None => {
                warn!("No history for commodity {name:?}");
                None
            }
        })
        .collect();

    let series = truncate_to_common_tail(&series);
    let domain: Vec<String> = series
        .first()
        .map(|s| s.xs().map(str::to_string).collect())
        .unwrap_or_default();

    ChartFrame::build(&series, &domain, mode, width)
}

/// One macro indicator for one country, plotted on its own reporting dates.
///
/// `payload` is the `/macro` response: `{"countries": {<country>: {...}}}`.
pub fn macro_frame(
    payload: &Value,
    country: &str,
    indicator: MacroIndicator,
    mode: NormalizationMode,
    width: f64,
) -> ChartFrame {
    let series = payload
        .get("countries")
        .and_then(|countries| countries.get(country))
        .and_then(|region| region.get(indicator.key()))
        .and_then(|map| yearly_series(map, indicator.label(), indicator.from_year()))
        .map(|series| series.with_unit("%").with_color(MACRO_COLOR));

    let Some(series) = series else {
        warn!("No {indicator} data for {country:?}");
        return ChartFrame::build(&[], &[], mode, width);
    };

    let domain: Vec<String> = series.xs().map(str::to_string).collect();
    ChartFrame::build(&[series], &domain, mode, width)
}

/// A region's bond yields over the `months` before `today`. `histories`
/// may arrive in any order; lines are drawn shortest tenor first.
pub fn bond_frame(
    mut histories: Vec<(Bond, Vec<BondPoint>)>,
    today: NaiveDate,
    months: u32,
    mode: NormalizationMode,
    width: f64,
) -> ChartFrame {
    histories.sort_by_key(|(bond, _)| bond.tenor);
    let series: Vec<Series> = histories
        .iter()
        .map(|(bond, points)| {
            bond_series(&bond.series_name(), points)
                .with_unit("%")
                .with_color(bond.color())
        })
        .collect();

    ChartFrame::build(&series, &trailing_months(today, months), mode, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::{Region, Tenor};
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn history(points: &[(&str, f64)]) -> Value {
        Value::Array(
            points
                .iter()
                .map(|(date, close)| json!({"date": date, "close": close}))
                .collect(),
        )
    }

    #[test]
    fn dead_commodity_feed_leaves_the_rest_alone() {
        let payload = json!({
            "commodities": {
                "Gold": {"history": history(&[("2024-01-01", 2000.0), ("2024-01-02", 2010.0), ("2024-01-03", 2100.0)])},
                "Copper": {"history": []},
                "Silver": {"history": history(&[("2024-01-02", 20.0), ("2024-01-03", 22.0)])}
            }
        });

        let frame = commodity_frame(&payload, &[], NormalizationMode::Raw, 800.0);
        let names: Vec<_> = frame.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Gold", "Silver"]);
        assert_eq!(frame.x, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(frame.series[0].y, vec![Some(2010.0), Some(2100.0)]);
    }

    #[test]
    fn named_commodities_only() {
        let payload = json!({
            "commodities": {
                "Gold": {"history": history(&[("2024-01-01", 100.0), ("2024-01-02", 110.0)])},
                "Silver": {"history": history(&[("2024-01-01", 20.0), ("2024-01-02", 16.0)])}
            }
        });
        let frame = commodity_frame(
            &payload,
            &["Silver".to_string(), "Platinum".to_string()],
            NormalizationMode::Normalised,
            800.0,
        );
        assert_eq!(frame.series.len(), 1);
        assert_eq!(frame.series[0].y, vec![Some(100.0), Some(80.0)]);
    }

    #[test]
    fn market_indices_align_on_daily_domain() {
        let payload = json!({
            "indices": {
                "NASDAQ": {"history": history(&[("2024-06-03", 100.0), ("2024-06-05", 105.0)])},
                "S&P 500": {"history": history(&[("2024-06-04", 50.0), ("2024-06-05", 51.0), ("2023-01-01", 1.0)])},
                "FTSE 100": {"history": history(&[("2024-06-04", 8000.0)])}
            }
        });

        let frame = market_frame(&payload, day("2024-06-05"), 1, NormalizationMode::Raw, 800.0);
        assert_eq!(frame.x.first().map(String::as_str), Some("2024-05-05"));
        assert_eq!(frame.x.last().map(String::as_str), Some("2024-06-05"));
        assert_eq!(frame.series.len(), 2);
        assert!(frame.series.iter().all(|s| s.y.len() == frame.x.len()));

        let nasdaq = &frame.series[0];
        assert_eq!(nasdaq.color.as_deref(), Some("#1976d2"));
        let tail = &nasdaq.y[nasdaq.y.len() - 3..];
        assert_eq!(tail, [Some(100.0), Some(100.0), Some(105.0)]);
    }

    #[test]
    fn macro_indicator_by_year() {
        let payload = json!({
            "countries": {
                "Germany": {
                    "inflation": {"2020": 0.4, "2021": 3.2, "2022": 8.7, "2023": 6.0},
                    "interest_rate": {"1998": 3.0, "2021": 0.0, "2023": 4.5}
                }
            }
        });

        let frame = macro_frame(&payload, "Germany", MacroIndicator::Inflation, NormalizationMode::Raw, 600.0);
        assert_eq!(frame.series.len(), 1);
        assert_eq!(frame.series[0].name, "CPI");
        assert_eq!(frame.x.len(), 4);
        assert_eq!(frame.ticks.tick_labels, vec!["2020", "2021", "2022", "2023"]);

        let rates = macro_frame(&payload, "Germany", MacroIndicator::InterestRate, NormalizationMode::Raw, 600.0);
        assert_eq!(rates.x, vec!["2021-01-01", "2023-01-01"]);

        let missing = macro_frame(&payload, "Japan", MacroIndicator::Inflation, NormalizationMode::Raw, 600.0);
        assert!(missing.is_empty());
    }

    #[test]
    fn indicator_names_parse() {
        assert_eq!("gdp-growth".parse::<MacroIndicator>(), Ok(MacroIndicator::GdpGrowth));
        assert_eq!("Interest Rate".parse::<MacroIndicator>(), Ok(MacroIndicator::InterestRate));
        assert!("vibes".parse::<MacroIndicator>().is_err());
    }

    #[test]
    fn bond_lines_follow_tenor_order() {
        let point = |x: &str, y: f64| BondPoint {
            x: Some(x.to_string()),
            y: Some(y),
        };
        let bond = |tenor| Bond {
            region: Region::Uk,
            tenor,
        };
        let histories = vec![
            (bond(Tenor::TenYear), vec![point("Jun 04, 2024", 4.2), point("Jun 05, 2024", 4.3)]),
            (bond(Tenor::TwoYear), vec![point("Jun 04, 2024", 4.4), point("Jun 05, 2024", 4.5)]),
        ];

        let frame = bond_frame(histories, day("2024-06-05"), 6, NormalizationMode::Raw, 800.0);
        let names: Vec<_> = frame.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["United Kingdom 2Y", "United Kingdom 10Y"]);
        assert_eq!(frame.series[1].color.as_deref(), Some("#ba68c8"));
        assert_eq!(frame.x.len(), 184);
    }
}
