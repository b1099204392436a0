use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Sentinel returned by `detect_date_format` when the values are already
/// RFC 3339 / ISO 8601 timestamps with an offset (e.g. `2026-02-10T22:26:28.987Z`).
pub const RFC3339_FORMAT: &str = "__rfc3339__";

/// Date formats tried when normalising time-series x values.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
];

const ISO_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Pick the format that parses the largest share of `values`.
/// RFC 3339 wins ties so already-normalised data is left alone.
pub fn detect_date_format(values: &[&str]) -> Option<&'static str> {
    let sample: Vec<&str> = values
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let rfc3339_valid = sample
        .iter()
        .filter(|s| DateTime::parse_from_rfc3339(s).is_ok())
        .count();

    let mut best_format = (rfc3339_valid > 0).then_some(RFC3339_FORMAT);
    let mut best_valid = rfc3339_valid;

    for &fmt in DATE_FORMATS {
        let valid = sample.iter().filter(|s| parse_with(s, fmt).is_some()).count();
        if valid > best_valid {
            best_valid = valid;
            best_format = Some(fmt);
        }
    }

    best_format
}

/// Parse `value` with `format`, accepting date-only formats as midnight.
pub fn parse_with(value: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        Some(dt)
    } else if let Ok(d) = NaiveDate::parse_from_str(value, format) {
        d.and_hms_opt(0, 0, 0)
    } else {
        None
    }
}

/// Rewrite string `x` values of `{x, y}` points into ISO 8601 so the
/// Chart.js time scale can read them. Numeric timestamps, RFC 3339 strings
/// and values in no recognised format are left untouched.
pub fn normalize_point_dates(points: &mut [Value]) {
    let raw: Vec<String> = points
        .iter()
        .filter_map(|p| p.get("x").and_then(Value::as_str).map(str::to_string))
        .collect();
    let refs: Vec<&str> = raw.iter().map(String::as_str).collect();

    let format = match detect_date_format(&refs) {
        Some(RFC3339_FORMAT) | None => return,
        Some(fmt) => fmt,
    };

    for point in points.iter_mut() {
        let Some(x) = point.get_mut("x") else { continue };
        let parsed = x.as_str().and_then(|s| parse_with(s.trim(), format));
        if let Some(dt) = parsed {
            *x = Value::from(dt.format(ISO_OUTPUT).to_string());
        }
    }
}
