//! Human-readable recurrence summaries.
//!
//! Shown above the occurrence preview and in meeting details, e.g.
//! "Every 2 weeks on Monday and Thursday at 14:30, 6 times".

use chrono::Weekday;

use crate::config::{MonthlyPattern, PatternType, RecurrenceConfig, TerminationRule};

/// Describe a recurrence configuration in one line of English.
///
/// Never fails; incomplete configurations are described as far as they go.
///
/// # Examples
///
/// ```
/// use meeting_recurrence::{describe, RecurrenceConfig};
///
/// let config = RecurrenceConfig::weekly([1, 3, 5]).ending_after(5).unwrap();
/// assert_eq!(
///     describe(&config),
///     "Every week on Monday, Wednesday and Friday, 5 times"
/// );
/// ```
pub fn describe(config: &RecurrenceConfig) -> String {
    if !config.enabled {
        return "Does not repeat".to_string();
    }

    let mut text = match config.pattern_type {
        PatternType::Daily => every(config.interval.get(), "day"),
        PatternType::Weekly => {
            let names: Vec<String> = config
                .weekdays()
                .iter()
                .map(|d| weekday_name(*d).to_string())
                .collect();
            let base = every(config.interval.get(), "week");
            if names.is_empty() {
                format!("{base} (no days selected)")
            } else {
                format!("{base} on {}", join_english(&names))
            }
        }
        PatternType::Monthly => {
            let base = every(config.interval.get(), "month");
            match config.monthly_pattern {
                MonthlyPattern::SameDate => format!("{base} on the same date"),
                MonthlyPattern::DayOfWeek => format!("{base} on the same weekday"),
                MonthlyPattern::SpecificDates => {
                    let dates: Vec<String> =
                        config.month_dates().into_iter().map(ordinal).collect();
                    if dates.is_empty() {
                        format!("{base} (no dates selected)")
                    } else {
                        format!("{base} on the {}", join_english(&dates))
                    }
                }
            }
        }
        PatternType::Custom => {
            let custom = config.custom_pattern_text.trim();
            return if custom.is_empty() {
                "Custom recurrence".to_string()
            } else {
                custom.to_string()
            };
        }
    };

    if let Some(time) = config.time_of_day {
        text.push_str(&format!(" at {}", time.format("%H:%M")));
    }

    match config.termination_rule {
        TerminationRule::Never => {}
        TerminationRule::ByDate => {
            if let Some(end) = config.end_date {
                text.push_str(&format!(", until {}", end.format("%B %-d, %Y")));
            }
        }
        TerminationRule::ByOccurrenceCount => {
            if let Some(count) = config.max_occurrences {
                if count.get() == 1 {
                    text.push_str(", once");
                } else {
                    text.push_str(&format!(", {count} times"));
                }
            }
        }
    }

    text
}

/// "Every day" / "Every 3 days".
fn every(interval: u32, unit: &str) -> String {
    if interval == 1 {
        format!("Every {unit}")
    } else {
        format!("Every {interval} {unit}s")
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// 1 → "1st", 22 → "22nd", 13 → "13th".
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// "a", "a and b", "a, b and c".
fn join_english(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}
