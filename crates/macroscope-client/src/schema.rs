use chrono::Datelike;
use macroscope_series::{date_key, parse_date_key, Series};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Search
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// `GET /search/start`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SearchStarted {
    pub search_id: String,
}

/// `GET /search/results`
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SearchBatch {
    #[serde(default, deserialize_with = "de_search_results")]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub price: Option<f64>,
    #[serde(rename = "changePercent", default, deserialize_with = "de_lenient_f64")]
    pub change_percent: Option<f64>,
}

impl SearchResult {
    /// Identity for de-duplication: the same ticker on two exchanges is two
    /// results.
    pub fn dedupe_key(&self) -> String {
        format!("{}{}", self.symbol, self.exchange.as_deref().unwrap_or(""))
    }
}

/// Results without a usable `symbol` are dropped; one bad entry doesn't sink
/// the whole batch.
fn de_search_results<'de, D>(deserializer: D) -> Result<Vec<SearchResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Value = Deserialize::deserialize(deserializer)?;
    Ok(search_results(raw))
}

/// Search results from either a bare array or a `{"results": [...]}` object.
pub fn search_results(payload: Value) -> Vec<SearchResult> {
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SearchResult>(entry) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("skipping malformed search result: {e}");
                None
            }
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Numbers
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Read a number the way the backend sends it:
///
/// ```text
/// 12.5      -> Some(12.5)
/// "12.5"    -> Some(12.5)
/// "N/A"     -> None
/// null      -> None
/// ```
///
/// Non-finite values are `None` too.
pub fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    Ok(lenient_f64(&value))
}

pub fn lenient_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Histories
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// `GET /bond_history/<symbol>` element. Dates arrive as `"Sep 30, 2024"`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BondPoint {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub y: Option<f64>,
}

/// Turn a bond yield history into a chartable series keyed by ISO date.
/// Points whose date can't be read are dropped; the rest are sorted
/// oldest first.
pub fn bond_series(name: &str, points: &[BondPoint]) -> Series {
    let mut dated: Vec<_> = points
        .iter()
        .filter_map(|p| {
            let raw = p.x.as_deref()?;
            match parse_date_key(raw) {
                Some(date) => Some((date, p.y)),
                None => {
                    warn!("{name}: dropping point with unreadable date {raw:?}");
                    None
                }
            }
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    Series::from_pairs(name, dated.into_iter().map(|(d, y)| (date_key(d), y)))
}

/// Pull `payload[group][key].history` out of a market or macro payload.
///
/// History points look like `{date, close}` or `{date, value}`. A missing
/// group, key or history is `None`; unusable points inside a history become
/// gaps or are skipped.
pub fn history_series(payload: &Value, group: &str, key: &str) -> Option<Series> {
    let entry = payload.get(group)?.get(key)?;
    let history = entry.get("history")?.as_array()?;

    let mut series = Series::new(key);
    for point in history {
        let Some(date) = point.get("date").and_then(Value::as_str).and_then(parse_date_key) else {
            continue;
        };
        let y = point
            .get("close")
            .and_then(lenient_f64)
            .or_else(|| point.get("value").and_then(lenient_f64));
        series.push(date_key(date), y);
    }

    if let Some(unit) = entry.get("unit").and_then(Value::as_str) {
        if !unit.is_empty() {
            series = series.with_unit(unit);
        }
    }
    Some(series)
}

/// A macro indicator stored as `{"2019": 1.8, "2020": -3.4, ...}`.
///
/// Bare years land on the 1st of January; any other key goes through
/// [`parse_date_key`] and is skipped if unreadable. Years before `from_year`
/// are dropped, and so are non-numeric values when `from_year` is set. The
/// result is sorted oldest first. `None` unless `map` is an object.
pub fn yearly_series(map: &Value, name: &str, from_year: Option<i32>) -> Option<Series> {
    let entries = map.as_object()?;

    let mut dated: Vec<_> = entries
        .iter()
        .filter_map(|(key, value)| {
            let key = key.trim();
            let date = if key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit()) {
                parse_date_key(&format!("{key}-01-01"))
            } else {
                parse_date_key(key)
            };
            let Some(date) = date else {
                warn!("{name}: dropping unreadable period {key:?}");
                return None;
            };
            Some((date, lenient_f64(value)))
        })
        .filter(|(date, y)| match from_year {
            Some(from) => date.year() >= from && y.is_some(),
            None => true,
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    Some(Series::from_pairs(name, dated.into_iter().map(|(d, y)| (date_key(d), y))))
}
