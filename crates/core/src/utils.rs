use crate::error::Error;
use crate::ports::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::Display;

// Any non-zero offset works; it only has to differ from UTC
const ZONE_CHECK_OFFSET_SECS: i32 = 3600;

/// Parses a post date as stored by the content store
/// Supports various formats: ISO 8601, RFC 2822, SQLite datetime, date only,
/// and zone-less dates `dateparser` recognises. The wall-clock value is kept
/// as given; offsets are not normalised.
pub fn parse_post_date(timestamp_str: &str) -> Result<NaiveDateTime> {
    let timestamp_str = timestamp_str.trim();
    if timestamp_str.is_empty() {
        return Err(Error::InvalidInput("empty date".to_string()));
    }

    // ISO 8601 with timezone (e.g., "2025-12-16T10:30:00Z" or "2025-12-16T10:30:00+02:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp_str) {
        return Ok(dt.naive_local());
    }

    // RFC 2822 (e.g., "Sun, 31 Dec 2023 23:30:00 -0500")
    if let Ok(dt) = DateTime::parse_from_rfc2822(timestamp_str) {
        return Ok(dt.naive_local());
    }

    if let Ok(naive_dt) = NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive_dt);
    }

    // SQLite datetime format (e.g., "2025-12-16 10:30:00")
    if let Ok(naive_dt) = NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive_dt);
    }

    // Date only, treated as midnight
    if let Some(naive_dt) = NaiveDate::parse_from_str(timestamp_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(naive_dt);
    }

    parse_zoneless(timestamp_str)
}

/// Last-resort parse through `dateparser`, limited to input that names a
/// year and carries no zone of its own
fn parse_zoneless(timestamp_str: &str) -> Result<NaiveDateTime> {
    // Without a year dateparser fills in the current date
    if !has_year(timestamp_str) {
        return Err(invalid_date(timestamp_str, "no year in date"));
    }

    let midnight = NaiveTime::MIN;
    let shifted_zone = FixedOffset::east_opt(ZONE_CHECK_OFFSET_SECS)
        .ok_or_else(|| invalid_date(timestamp_str, "bad zone check offset"))?;

    let as_utc = dateparser::parse_with(timestamp_str, &Utc, midnight)
        .map_err(|e| invalid_date(timestamp_str, e))?;
    let as_shifted = dateparser::parse_with(timestamp_str, &shifted_zone, midnight)
        .map_err(|e| invalid_date(timestamp_str, e))?;

    // Same instant under both zones means the input named its own zone,
    // and dateparser has already converted it away from the wall clock
    if as_utc == as_shifted {
        return Err(invalid_date(
            timestamp_str,
            "dates with a zone must be RFC 3339 or RFC 2822",
        ));
    }

    Ok(as_utc.naive_utc())
}

fn has_year(timestamp_str: &str) -> bool {
    timestamp_str
        .as_bytes()
        .windows(4)
        .any(|w| w.iter().all(u8::is_ascii_digit))
}

fn invalid_date(timestamp_str: &str, reason: impl Display) -> Error {
    Error::InvalidInput(format!("{timestamp_str}: {reason}"))
}

/// Turns a term name into a URL slug
/// Lower-cases, replaces anything that is not alphanumeric with a hyphen,
/// collapses runs of hyphens and trims them from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
