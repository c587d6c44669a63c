use crate::domain::parse_date_key;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Horizontal room one tick label needs, in pixels.
const PX_PER_TICK: f64 = 120.0;

/// Month ticks closer together than this collapse into the later one.
const MIN_MONTH_TICK_GAP_DAYS: i64 = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TickGranularity {
    #[default]
    Monthly,
    Yearly,
}

/// Where to put x-axis labels, and what they say.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TickSet {
    pub granularity: TickGranularity,
    pub tick_positions: Vec<String>,
    pub tick_labels: Vec<String>,
}

impl TickSet {
    pub fn len(&self) -> usize {
        self.tick_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick_positions.is_empty()
    }

    fn push(&mut self, position: &str, label: String) {
        self.tick_positions.push(position.to_string());
        self.tick_labels.push(label);
    }
}

/// Pick non-overlapping axis ticks for a date domain drawn `pixel_width`
/// pixels wide.
///
/// Domains spanning two calendar years or more get yearly ticks, thinned to
/// roughly one per 120 px and always ending on the final year. Shorter
/// domains get a tick at the first key of each month, labelled with the
/// month's name; month starts less than 20 days after the previous tick
/// replace it. Keys that aren't dates are skipped.
pub fn generate_ticks(x_domain: &[String], pixel_width: f64) -> TickSet {
    let dated: Vec<(&str, NaiveDate)> = x_domain
        .iter()
        .filter_map(|x| parse_date_key(x).map(|d| (x.as_str(), d)))
        .collect();

    let (Some((_, first)), Some((_, last))) = (dated.first(), dated.last()) else {
        return TickSet::default();
    };

    if last.year() - first.year() >= 2 {
        yearly_ticks(&dated, pixel_width)
    } else {
        monthly_ticks(&dated)
    }
}

fn max_ticks(pixel_width: f64) -> usize {
    let width = if pixel_width.is_finite() {
        pixel_width.max(0.0)
    } else {
        0.0
    };
    usize::max(2, (width / PX_PER_TICK).floor() as usize)
}

fn yearly_ticks(dated: &[(&str, NaiveDate)], pixel_width: f64) -> TickSet {
    let mut years: Vec<i32> = Vec::new();
    for (_, date) in dated {
        if !years.contains(&date.year()) {
            years.push(date.year());
        }
    }

    let step = usize::max(1, years.len().div_ceil(max_ticks(pixel_width)));
    let mut ticks = TickSet {
        granularity: TickGranularity::Yearly,
        ..Default::default()
    };

    for year in years.iter().step_by(step) {
        if let Some((key, _)) = dated.iter().find(|(_, d)| d.year() == *year) {
            ticks.push(key, year.to_string());
        }
    }

    // the final year is always labelled, on its last key
    if let Some(final_year) = years.last() {
        let label = final_year.to_string();
        if ticks.tick_labels.last() != Some(&label) {
            if let Some((key, _)) = dated.iter().rev().find(|(_, d)| d.year() == *final_year) {
                ticks.push(key, label);
            }
        }
    }

    ticks
}

fn monthly_ticks(dated: &[(&str, NaiveDate)]) -> TickSet {
    let mut ticks = TickSet::default();
    let mut last_month = None;
    let mut last_tick: Option<NaiveDate> = None;

    for (key, date) in dated {
        let month = (date.year(), date.month());
        if last_month == Some(month) {
            continue;
        }
        let label = date.format("%B").to_string();

        let crowded = last_tick
            .is_some_and(|prev| (*date - prev).num_days() < MIN_MONTH_TICK_GAP_DAYS);
        if crowded {
            if let (Some(position), Some(last_label)) =
                (ticks.tick_positions.last_mut(), ticks.tick_labels.last_mut())
            {
                *position = key.to_string();
                *last_label = label;
            }
        } else {
            ticks.push(key, label);
        }

        last_tick = Some(*date);
        last_month = Some(month);
    }

    ticks
}
