//! Parsing of the textual inputs callers hand to generation: a reference
//! instant and an IANA timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::dst::resolve_local;
use crate::error::{RecurrenceError, Result};

/// Parse an IANA timezone name into `Tz`.
///
/// # Errors
///
/// Returns [`RecurrenceError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| RecurrenceError::InvalidTimezone(format!("'{s}'")))
}

/// Parse a reference instant and express it in `tz`.
///
/// Accepts an RFC 3339 datetime (`2024-01-01T09:00:00Z`) or a bare ISO date
/// (`2024-01-01`), which means local midnight in `tz`.
///
/// # Errors
///
/// Returns [`RecurrenceError::InvalidDatetime`] if neither form parses.
pub fn parse_reference(s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).with_timezone(tz));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| resolve_local(tz, midnight))
        .ok_or_else(|| {
            RecurrenceError::InvalidDatetime(format!(
                "'{s}': expected RFC 3339 or YYYY-MM-DD"
            ))
        })
}
