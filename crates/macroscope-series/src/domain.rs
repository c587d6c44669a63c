use chrono::{Days, Months, NaiveDate};

const ISO_DATE: &str = "%Y-%m-%d";

/// Read a date key in any of the shapes the backend hands out:
///
/// ```text
/// "2024-09-30"            -> 2024-09-30
/// "2024-09-30T14:00:00Z"  -> 2024-09-30
/// "Sep 30, 2024"          -> 2024-09-30
/// "September 30, 2024"    -> 2024-09-30
/// ```
///
/// Anything else is `None`.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, ISO_DATE) {
        return Some(date);
    }

    // ISO datetimes: the calendar date is the leading ten characters
    if let Some(head) = s.get(..10) {
        let separator = s[10..].chars().next();
        if matches!(separator, Some('T') | Some(' ')) {
            if let Ok(date) = NaiveDate::parse_from_str(head, ISO_DATE) {
                return Some(date);
            }
        }
    }

    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Render a date as the canonical x-key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// `days` consecutive date keys ending at `end` (inclusive), oldest first.
pub fn trailing_days(end: NaiveDate, days: usize) -> Vec<String> {
    (0..days as u64)
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(back)))
        .map(date_key)
        .collect()
}

/// Every calendar day from `end - months` to `end`, both inclusive.
pub fn trailing_months(end: NaiveDate, months: u32) -> Vec<String> {
    let Some(start) = end.checked_sub_months(Months::new(months)) else {
        return Vec::new();
    };
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(date_key)
        .collect()
}

/// The first and last key of `domain`, pushed outward by `pad_days` so the
/// end points don't sit on the axis edge.
pub fn padded_bounds(domain: &[String], pad_days: u64) -> Option<(String, String)> {
    let first = parse_date_key(domain.first()?)?;
    let last = parse_date_key(domain.last()?)?;
    let start = first.checked_sub_days(Days::new(pad_days))?;
    let end = last.checked_add_days(Days::new(pad_days))?;
    Some((date_key(start), date_key(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_backend_date_shapes() {
        let expected = Some(ymd(2024, 9, 30));
        assert_eq!(parse_date_key("2024-09-30"), expected);
        assert_eq!(parse_date_key("2024-09-30T14:00:00Z"), expected);
        assert_eq!(parse_date_key("2024-09-30 14:00:00"), expected);
        assert_eq!(parse_date_key("Sep 30, 2024"), expected);
        assert_eq!(parse_date_key("September 30, 2024"), expected);
        assert_eq!(parse_date_key(" 2024-09-30 "), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date_key(""), None);
        assert_eq!(parse_date_key("N/A"), None);
        assert_eq!(parse_date_key("2024-13-01"), None);
        assert_eq!(parse_date_key("2024-02-30T00:00:00"), None);
    }

    #[test]
    fn trailing_days_ends_on_end_date() {
        let days = trailing_days(ymd(2024, 3, 2), 4);
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]);
        assert!(trailing_days(ymd(2024, 3, 2), 0).is_empty());
    }

    #[test]
    fn trailing_months_covers_every_day() {
        let days = trailing_months(ymd(2024, 7, 15), 6);
        assert_eq!(days.first().map(String::as_str), Some("2024-01-15"));
        assert_eq!(days.last().map(String::as_str), Some("2024-07-15"));
        // 2024-01-15 ..= 2024-07-15 in a leap year
        assert_eq!(days.len(), 183);
    }

    #[test]
    fn padded_bounds_extend_both_ends() {
        let domain = vec!["2024-01-01".to_string(), "2024-01-31".to_string()];
        assert_eq!(
            padded_bounds(&domain, 3),
            Some(("2023-12-29".to_string(), "2024-02-03".to_string()))
        );
        assert_eq!(padded_bounds(&[], 3), None);
        assert_eq!(padded_bounds(&["junk".to_string()], 3), None);
    }
}
