use status_core::{
    commit_delta, elapsed_seconds, format_commit_delta, format_duration, parse_date,
    DerivedFields, RecipeStatus, UNKNOWN,
};

#[test]
fn duration_scenarios() {
    assert_eq!(format_duration(Some(0.0)), "0.0s");
    assert_eq!(format_duration(Some(3.2)), "3.2s");
    assert_eq!(format_duration(Some(65.0)), "1m 5s");
    assert_eq!(format_duration(Some(90.0)), "1m 30s");
    assert_eq!(format_duration(Some(3600.0)), "1h 0m");
    assert_eq!(format_duration(Some(90000.0)), "1 day");
    assert_eq!(format_duration(Some(31_536_000.0)), "1 year 0 months");
    assert_eq!(format_duration(None), "Unknown");
}

#[test]
fn duration_uses_most_significant_unit() {
    let day = 86_400.0;
    let month = 365.0 * day / 12.0;

    assert_eq!(format_duration(Some(2.0 * day + 5.0 * 3600.0)), "2 days");
    assert_eq!(format_duration(Some(month + 3.0 * day)), "1 month 3 days");
    assert_eq!(format_duration(Some(3.0 * month)), "3 months 0 days");
    assert_eq!(
        format_duration(Some(2.0 * 365.0 * day + 2.0 * month)),
        "2 years 2 months"
    );
    assert_eq!(format_duration(Some(2.0 * 3600.0 + 61.0)), "2h 1m");
}

#[test]
fn duration_zero_differs_from_unknown() {
    assert_ne!(format_duration(Some(0.0)), format_duration(None));
    assert_eq!(format_duration(Some(f64::NAN)), UNKNOWN);
}

#[test]
fn negative_duration_is_signed() {
    assert_eq!(format_duration(Some(-65.0)), "-1m 5s");
}

#[test]
fn elapsed_between_dates() {
    assert_eq!(
        elapsed_seconds(Some("2020-01-01T00:00:00Z"), Some("2020-01-02T00:00:30Z")),
        Some(86_430)
    );
    assert_eq!(
        elapsed_seconds(Some("2020-01-01 12:00:00 +0200"), Some("2020-01-01T10:01:00+00:00")),
        Some(60)
    );
    assert_eq!(
        elapsed_seconds(Some("2020-01-01T00:00:00.5"), Some("2020-01-01T00:00:10.5")),
        Some(10)
    );
}

#[test]
fn elapsed_is_unknown_without_both_dates() {
    assert_eq!(elapsed_seconds(None, Some("2020-01-01T00:00:00Z")), None);
    assert_eq!(elapsed_seconds(Some("2020-01-01T00:00:00Z"), None), None);
    assert_eq!(elapsed_seconds(Some("garbage"), Some("2020-01-01")), None);
    assert_eq!(elapsed_seconds(Some(""), Some("2020-01-01")), None);
}

#[test]
fn plain_dates_parse_at_midnight_utc() {
    let parsed = parse_date("2021-03-04").expect("date");
    assert_eq!(parsed.to_rfc3339(), "2021-03-04T00:00:00+00:00");
}

#[test]
fn commit_delta_requires_non_zero_counts() {
    assert_eq!(commit_delta(Some(10), Some(15)), Some(5));
    assert_eq!(commit_delta(Some(0), Some(5)), None);
    assert_eq!(commit_delta(Some(5), Some(0)), None);
    assert_eq!(commit_delta(None, Some(5)), None);
    assert_eq!(format_commit_delta(None), "Unknown");
    assert_eq!(format_commit_delta(Some(3)), "3");
}

#[test]
fn derived_fields_for_record() {
    let mut record = RecipeStatus::named("fmt");
    record.current.date = Some("2020-01-01T00:00:00Z".to_string());
    record.new.date = Some("2020-01-01T01:00:00Z".to_string());
    record.current.commit_count = Some(0);
    record.new.commit_count = Some(5);

    let derived = DerivedFields::for_record(&record);

    assert_eq!(derived.time_interval, Some(3600));
    assert_eq!(derived.commit_delta, None);
}
