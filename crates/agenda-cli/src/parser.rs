use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a date-time, either in ISO-like form or as English ("tomorrow 9am", "next friday").
///
/// A bare date means midnight. Relative expressions are resolved against `now`.
pub fn parse_datetime(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    parse_date_string(input, Utc.from_utc_datetime(&now), Dialect::Us)
        .map(|parsed| parsed.naive_utc())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// Parses a calendar date; English expressions keep only their date part.
pub fn parse_date(input: &str, now: NaiveDateTime) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_datetime(input, now).map(|parsed| parsed.date())
}
