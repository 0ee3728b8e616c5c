//! RFC 5545 export of a recurrence configuration.
//!
//! The submission side persists the configuration, not the expanded dates.
//! An RRULE rendering of that configuration lets calendar clients expand the
//! same series. The safety cap is a preview concern and is not exported.

use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::config::{MonthlyPattern, PatternType, RecurrenceConfig, TerminationRule};
use crate::dst::resolve_local;
use crate::error::{RecurrenceError, Result};

/// Render a configuration as a `DTSTART` + `RRULE` block.
///
/// `dtstart` anchors the series exactly as the reference instant anchors
/// generation: its date and timezone, with the configured time of day if one
/// is set.
///
/// # Returns
///
/// `Ok(None)` when the recurrence is disabled (the meeting does not repeat).
///
/// # Errors
///
/// - Any [`RecurrenceConfig::validate`] error
/// - [`RecurrenceError::Unsupported`] for custom free-text patterns
/// - [`RecurrenceError::InvalidRule`] if the rendered rule does not parse back
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use meeting_recurrence::{to_rrule, RecurrenceConfig};
///
/// let config = RecurrenceConfig::weekly([1, 3]).ending_after(4).unwrap();
/// let start = Tz::UTC.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
/// let rule = to_rrule(&config, start).unwrap().unwrap();
/// assert_eq!(
///     rule,
///     "DTSTART:20240101T090000Z\nRRULE:FREQ=WEEKLY;BYDAY=MO,WE;WKST=SU;COUNT=4"
/// );
/// ```
pub fn to_rrule(config: &RecurrenceConfig, dtstart: DateTime<Tz>) -> Result<Option<String>> {
    if !config.enabled {
        return Ok(None);
    }
    config.validate()?;

    let dtstart = match config.time_of_day {
        Some(time) => resolve_local(&dtstart.timezone(), dtstart.date_naive().and_time(time))
            .ok_or_else(|| {
                RecurrenceError::InvalidConfig(format!(
                    "no instant for {time} on {}",
                    dtstart.date_naive()
                ))
            })?,
        None => dtstart,
    };

    let mut parts = vec![frequency_part(config)?];
    if config.interval.get() > 1 {
        parts.push(format!("INTERVAL={}", config.interval));
    }
    parts.extend(by_parts(config, &dtstart));
    if let Some(termination) = termination_part(config) {
        parts.push(termination);
    }

    let block = format!("{}\nRRULE:{}", dtstart_line(&dtstart), parts.join(";"));

    block
        .parse::<RRuleSet>()
        .map_err(|e| RecurrenceError::InvalidRule(format!("'{block}': {e}")))?;

    Ok(Some(block))
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn dtstart_line(dtstart: &DateTime<Tz>) -> String {
    let tz = dtstart.timezone();
    if tz == Tz::UTC {
        format!("DTSTART:{}", format_utc(&dtstart.with_timezone(&Utc)))
    } else {
        format!(
            "DTSTART;TZID={}:{}",
            tz.name(),
            dtstart.format("%Y%m%dT%H%M%S")
        )
    }
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn frequency_part(config: &RecurrenceConfig) -> Result<String> {
    let freq = match config.pattern_type {
        PatternType::Daily => "DAILY",
        PatternType::Weekly => "WEEKLY",
        PatternType::Monthly => "MONTHLY",
        PatternType::Custom => {
            return Err(RecurrenceError::Unsupported(format!(
                "custom pattern '{}' has no RRULE form",
                config.custom_pattern_text
            )));
        }
    };
    Ok(format!("FREQ={freq}"))
}

fn by_parts(config: &RecurrenceConfig, dtstart: &DateTime<Tz>) -> Vec<String> {
    match config.pattern_type {
        PatternType::Weekly => {
            let days: Vec<&str> = config.weekdays().into_iter().map(weekday_code).collect();
            vec![format!("BYDAY={}", days.join(",")), "WKST=SU".to_string()]
        }
        PatternType::Monthly => match config.monthly_pattern {
            MonthlyPattern::SameDate => {
                let day = dtstart.day();
                if day <= 28 {
                    vec![format!("BYMONTHDAY={day}")]
                } else {
                    // Last existing day among 28..=day reproduces the clamp to
                    // short months.
                    let days: Vec<String> = (28..=day).map(|d| d.to_string()).collect();
                    vec![
                        format!("BYMONTHDAY={}", days.join(",")),
                        "BYSETPOS=-1".to_string(),
                    ]
                }
            }
            MonthlyPattern::SpecificDates => {
                let days: Vec<String> = config
                    .month_dates()
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                vec![format!("BYMONTHDAY={}", days.join(","))]
            }
            MonthlyPattern::DayOfWeek => {
                let ordinal = (dtstart.day() - 1) / 7 + 1;
                let ordinal = if ordinal >= 5 {
                    "-1".to_string()
                } else {
                    ordinal.to_string()
                };
                vec![format!(
                    "BYDAY={ordinal}{}",
                    weekday_code(dtstart.weekday())
                )]
            }
        },
        PatternType::Daily | PatternType::Custom => Vec::new(),
    }
}

fn termination_part(config: &RecurrenceConfig) -> Option<String> {
    match config.termination_rule {
        TerminationRule::Never => None,
        TerminationRule::ByDate => config
            .end_date
            .map(|end| format!("UNTIL={}", format_utc(&end))),
        TerminationRule::ByOccurrenceCount => {
            config.max_occurrences.map(|n| format!("COUNT={n}"))
        }
    }
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
