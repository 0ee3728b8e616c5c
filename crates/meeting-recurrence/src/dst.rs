//! Resolving wall-clock meeting times across DST transitions.
//!
//! Occurrences are stepped on local calendar dates and then pinned to a
//! wall-clock time, so a step can land on a local time that is ambiguous
//! (fall back) or that does not exist (spring forward).

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Resolve a local wall-clock datetime to an instant in `tz`.
///
/// - Ambiguous times (the repeated hour when clocks fall back) take the
///   earlier instant.
/// - Nonexistent times (the skipped hour when clocks spring forward) shift
///   forward past the gap, so 02:30 on a spring-forward night becomes 03:30.
///
/// Returns `None` only if no instant can be found even after the shift.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}
