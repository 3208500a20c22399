use anyhow::Context;
use chrono::{DateTime, NaiveDate};

const DATE_TIME_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S %z";
const DATE_ONLY: &str = "%Y-%m-%d";

/// Parse a user-supplied cutoff into milliseconds since the Unix epoch
///
/// Accepted forms, tried in order:
/// - integer epoch milliseconds (`1700000000000`)
/// - RFC 3339 (`2024-01-15T10:00:00+02:00`)
/// - RFC 2822 (`Mon, 15 Jan 2024 10:00:00 +0200`)
/// - `2024-01-15 10:00:00 +0200`
/// - `2024-01-15`, taken as midnight UTC
pub fn parse_cutoff(raw: &str) -> anyhow::Result<i64> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }

    let with_offset = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .or_else(|_| DateTime::parse_from_str(raw, DATE_TIME_WITH_OFFSET));
    if let Ok(date) = with_offset {
        return Ok(date.timestamp_millis());
    }

    let date = NaiveDate::parse_from_str(raw, DATE_ONLY)
        .with_context(|| format!("Invalid cutoff date: {raw}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid cutoff date: {raw}"))?;

    Ok(midnight.and_utc().timestamp_millis())
}
