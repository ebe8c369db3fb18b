//! Field-level normalization for raw collision CSV values.
//!
//! Every function here is total: garbage in produces a sentinel, `0` or
//! `None`, never an error.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use collision_dash_collision_models::{UNKNOWN, UNSPECIFIED};

/// Raw spellings that mean "no value".
const MISSING_VALUES: &[&str] = &["", "NAN", "NONE", "NULL", "UNKNOWN"];

/// Trims and upper-cases a categorical value, mapping missing spellings to
/// [`UNKNOWN`].
#[must_use]
pub fn parse_category(raw: &str) -> String {
    let value = raw.trim().to_uppercase();
    if MISSING_VALUES.contains(&value.as_str()) {
        UNKNOWN.to_string()
    } else {
        value
    }
}

/// Like [`parse_category`], but keeps the source's `Unspecified` marker
/// distinct from a missing value.
#[must_use]
pub fn parse_contributing_factor(raw: &str) -> String {
    let value = parse_category(raw);
    if value == "UNSPECIFIED" {
        UNSPECIFIED.to_string()
    } else {
        value
    }
}

/// Parses a crash count. Floats are accepted (`"2.0"`); negative,
/// non-finite or unparseable values become `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => n.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Parses one coordinate. Returns `None` if missing, unparseable or zero.
#[must_use]
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    Some(value)
}

/// Extracts the year from a crash date in any of the formats the exports
/// use (`2021-09-11`, `09/11/2021`, `2021-09-11T00:00:00.000`).
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.year());
        }
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.year());
        }
    }
    None
}
