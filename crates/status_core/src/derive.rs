use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::RecipeStatus;

/// Rendering for any derived value that could not be computed.
pub const UNKNOWN: &str = "Unknown";

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const YEAR: f64 = 365.0 * DAY;
const MONTH: f64 = YEAR / 12.0;

/// View-local fields computed on top of a record. Never written back to the
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedFields {
    /// Seconds between the current and the new upstream date.
    pub time_interval: Option<i64>,
    pub commit_delta: Option<i64>,
}

impl DerivedFields {
    pub fn for_record(record: &RecipeStatus) -> Self {
        Self {
            time_interval: elapsed_seconds(
                record.current.date.as_deref(),
                record.new.date.as_deref(),
            ),
            commit_delta: commit_delta(record.current.commit_count, record.new.commit_count),
        }
    }
}

/// Parses the ISO-8601 flavours the producer emits. Naive timestamps are
/// taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Whole seconds from `current` to `new`; `None` if either date is missing
/// or unparseable.
pub fn elapsed_seconds(current: Option<&str>, new: Option<&str>) -> Option<i64> {
    let current = parse_date(current?)?;
    let new = parse_date(new?)?;
    Some((new - current).num_seconds())
}

/// `new - current`, only when both counts are present and non-zero. A zero
/// count counts as absent.
pub fn commit_delta(current: Option<u64>, new: Option<u64>) -> Option<i64> {
    let current = current.filter(|c| *c != 0)?;
    let new = new.filter(|n| *n != 0)?;
    Some(new as i64 - current as i64)
}

pub fn format_commit_delta(delta: Option<i64>) -> String {
    match delta {
        Some(delta) => delta.to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Compact human rendering of a duration in seconds, most significant
/// non-zero unit first. A year is 365 days and a month a twelfth of that.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) if seconds.is_finite() => {
            if seconds < 0.0 {
                format!("-{}", format_positive(-seconds))
            } else {
                format_positive(seconds)
            }
        }
        _ => UNKNOWN.to_string(),
    }
}

fn format_positive(seconds: f64) -> String {
    let mut rest = seconds;
    let years = take_whole(&mut rest, YEAR);
    let months = take_whole(&mut rest, MONTH);
    let days = take_whole(&mut rest, DAY);
    let hours = take_whole(&mut rest, HOUR);
    let minutes = take_whole(&mut rest, MINUTE);

    if years > 0 {
        format!("{} {}", plural(years, "year"), plural(months, "month"))
    } else if months > 0 {
        format!("{} {}", plural(months, "month"), plural(days, "day"))
    } else if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {}s", rest.round() as u64)
    } else {
        format!("{rest:.1}s")
    }
}

fn take_whole(rest: &mut f64, unit: f64) -> u64 {
    let whole = (*rest / unit).floor();
    *rest -= whole * unit;
    whole as u64
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
