use macroscope_series::{
    align, forward_fill, generate_ticks, normalise, trailing_days, ChartFrame,
    NormalizationMode, Series, TickGranularity,
};

fn january() -> Vec<String> {
    (1..=5).map(|d| format!("2024-01-0{d}")).collect()
}

#[test]
fn sparse_series_align_then_normalise() {
    let a = Series::from_pairs("A", [("2024-01-02", Some(10.0)), ("2024-01-04", Some(12.0))]);
    let set = align(&[a], &january());

    let y = &set.series[0].y;
    assert_eq!(y, &vec![None, Some(10.0), None, Some(12.0), None]);
    assert_eq!(normalise(y), vec![None, Some(100.0), Some(100.0), Some(120.0), Some(120.0)]);
    assert_eq!(forward_fill(y), vec![None, Some(10.0), Some(10.0), Some(12.0), Some(12.0)]);
}

#[test]
fn every_aligned_series_matches_the_domain() {
    let domain = january();
    let raw = vec![
        Series::from_pairs("inside", [("2024-01-01", Some(1.0))]),
        Series::from_pairs("outside", [("2023-01-01", Some(1.0))]),
        Series::new("empty"),
        Series::from_pairs("junk", [("not a date", Some(f64::NAN))]),
    ];
    let set = align(&raw, &domain);
    assert_eq!(set.series.len(), raw.len());
    for series in &set.series {
        assert_eq!(series.y.len(), domain.len(), "{}", series.name);
    }
}

#[test]
fn raw_and_normalised_views_share_one_raw_set() {
    let gold = Series::from_pairs(
        "Gold",
        [("2024-01-01", Some(2000.0)), ("2024-01-03", Some(2100.0))],
    )
    .with_unit("$");
    let silver = Series::from_pairs(
        "Silver",
        [("2024-01-02", Some(25.0)), ("2024-01-05", Some(20.0))],
    );
    let raw = vec![gold, silver];

    let normalised = ChartFrame::build(&raw, &january(), NormalizationMode::Normalised, 800.0);
    let plain = ChartFrame::build(&raw, &january(), NormalizationMode::Raw, 800.0);

    assert_eq!(normalised.series[0].y[2], Some(105.0));
    assert_eq!(normalised.series[1].y[4], Some(80.0));
    assert_eq!(plain.series[0].y[2], Some(2100.0));
    assert_eq!(plain.series[1].y[0], None);
    assert_eq!(raw[0].points[1].y, Some(2100.0));
}

#[test]
fn three_year_domain_switches_to_yearly_ticks() {
    let end = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).expect("date");
    let domain = trailing_days(end, 3 * 365);
    let ticks = generate_ticks(&domain, 600.0);
    assert_eq!(ticks.granularity, TickGranularity::Yearly);
    assert!(ticks.len() <= 600 / 120 + 1);
    assert_eq!(ticks, generate_ticks(&domain, 600.0));
}
