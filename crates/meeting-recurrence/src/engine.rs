//! Occurrence generation for recurring meetings.
//!
//! [`generate_occurrences`] is a pure function of a [`RecurrenceConfig`] and
//! an injected reference instant: no system clock access, no shared state.
//! It never fails. Inputs that cannot produce occurrences (a disabled
//! recurrence, a weekly pattern with no weekdays, a custom free-text pattern)
//! yield an empty sequence so a preview can always render something.
//!
//! # Stepping
//!
//! All stepping happens on local calendar dates in the reference instant's
//! timezone, then each date is pinned to the meeting's wall-clock time (see
//! [`crate::dst`]). Every step is computed from the reference date plus
//! `i * interval` units rather than from the previous occurrence, so monthly
//! clamping never drifts (31 Oct → 30 Nov → 31 Dec) and weekly patterns stay
//! on a single week grid.
//!
//! # Stop conditions
//!
//! Checked before each emission, in order:
//!
//! 1. the safety cap ([`SAFETY_CAP`]) is reached;
//! 2. the configured occurrence count is reached;
//! 3. the candidate lies after the configured end date (generation halts).

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::config::{MonthlyPattern, PatternType, RecurrenceConfig, TerminationRule};
use crate::dst::resolve_local;

/// Hard upper bound on generated occurrences, whatever the configuration.
pub const SAFETY_CAP: usize = 20;

/// Upper bound on stepping iterations (days, weeks or months advanced).
/// Keeps sparse patterns bounded, e.g. the 31st every 12 months from April.
const MAX_STEPS: u32 = 1000;

/// The outcome of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Generation {
    pub occurrences: Vec<DateTime<Tz>>,
    /// The safety cap stopped generation before the configuration's own
    /// termination rule did.
    pub truncated: bool,
}

/// Generate the upcoming occurrences of a recurring meeting.
///
/// # Arguments
///
/// * `config` — The recurrence configuration (never mutated)
/// * `reference_now` — The reference "now"; its timezone is the one in which
///   calendar stepping happens and in which occurrences are returned
///
/// # Returns
///
/// A strictly ascending, duplicate-free sequence of at most [`SAFETY_CAP`]
/// occurrences, none earlier than `reference_now`.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use meeting_recurrence::{generate_occurrences, RecurrenceConfig};
///
/// let config = RecurrenceConfig::daily()
///     .with_interval(2)
///     .unwrap()
///     .ending_after(3)
///     .unwrap();
/// let now = Tz::UTC.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
///
/// let dates = generate_occurrences(&config, now);
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[2].to_rfc3339(), "2024-01-05T09:00:00+00:00");
/// ```
pub fn generate_occurrences(
    config: &RecurrenceConfig,
    reference_now: DateTime<Tz>,
) -> Vec<DateTime<Tz>> {
    generate(config, reference_now).occurrences
}

pub(crate) fn generate(config: &RecurrenceConfig, reference_now: DateTime<Tz>) -> Generation {
    if !config.enabled {
        debug!("recurrence disabled, no occurrences");
        return Generation {
            occurrences: Vec::new(),
            truncated: false,
        };
    }

    let mut emitter = Emitter::new(config, reference_now);
    let anchor = Anchor {
        tz: reference_now.timezone(),
        date: reference_now.date_naive(),
        time: config.time_of_day.unwrap_or_else(|| reference_now.time()),
        step: config.interval.get(),
    };

    match config.pattern_type {
        PatternType::Daily => daily(&anchor, &mut emitter),
        PatternType::Weekly => {
            let weekdays = config.weekdays();
            if weekdays.is_empty() {
                debug!("weekly recurrence without weekdays, no occurrences");
            } else {
                weekly(&anchor, &weekdays, &mut emitter);
            }
        }
        PatternType::Monthly => match config.monthly_pattern {
            MonthlyPattern::SameDate => monthly_same_date(&anchor, &mut emitter),
            MonthlyPattern::SpecificDates => {
                let dates = config.month_dates();
                if dates.is_empty() {
                    debug!("monthly recurrence without dates, no occurrences");
                } else {
                    monthly_specific_dates(&anchor, &dates, &mut emitter);
                }
            }
            MonthlyPattern::DayOfWeek => monthly_day_of_week(&anchor, &mut emitter),
        },
        PatternType::Custom => {
            debug!(
                text = %config.custom_pattern_text,
                "custom recurrence cannot be expanded, no occurrences"
            );
        }
    }

    let generation = emitter.finish();
    trace!(
        pattern = ?config.pattern_type,
        count = generation.occurrences.len(),
        truncated = generation.truncated,
        "generated occurrences"
    );
    generation
}

// ── Emission ────────────────────────────────────────────────────────────────

/// Whether stepping should continue after offering a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Applies the past filter and stop conditions to candidates in step order.
struct Emitter {
    now: DateTime<Tz>,
    max_occurrences: Option<usize>,
    end_date: Option<DateTime<Utc>>,
    out: Vec<DateTime<Tz>>,
    truncated: bool,
}

impl Emitter {
    fn new(config: &RecurrenceConfig, now: DateTime<Tz>) -> Self {
        let max_occurrences = match config.termination_rule {
            TerminationRule::ByOccurrenceCount => config
                .max_occurrences
                .map(|n| usize::try_from(n.get()).unwrap_or(usize::MAX)),
            _ => None,
        };
        let end_date = match config.termination_rule {
            TerminationRule::ByDate => config.end_date,
            _ => None,
        };
        Self {
            now,
            max_occurrences,
            end_date,
            out: Vec::new(),
            truncated: false,
        }
    }

    fn offer(&mut self, candidate: DateTime<Tz>) -> Flow {
        // Past instants are never emitted and never count.
        if candidate < self.now {
            return Flow::Continue;
        }

        let emitted = self.out.len();
        let count_reached = self.max_occurrences.is_some_and(|max| emitted >= max);
        let past_end = self
            .end_date
            .is_some_and(|end| candidate.with_timezone(&Utc) > end);

        if emitted >= SAFETY_CAP {
            self.truncated = !count_reached && !past_end;
            return Flow::Stop;
        }
        if count_reached || past_end {
            return Flow::Stop;
        }

        self.out.push(candidate);
        Flow::Continue
    }

    /// Offer the meeting instant on a local date. Dates whose wall-clock
    /// time cannot be resolved are skipped.
    fn offer_date(&mut self, anchor: &Anchor, date: NaiveDate) -> Flow {
        match resolve_local(&anchor.tz, date.and_time(anchor.time)) {
            Some(candidate) => self.offer(candidate),
            None => Flow::Continue,
        }
    }

    /// Whether the meeting instant on `date` lies before the reference instant.
    fn is_past(&self, anchor: &Anchor, date: NaiveDate) -> bool {
        resolve_local(&anchor.tz, date.and_time(anchor.time)).is_some_and(|c| c < self.now)
    }

    fn finish(mut self) -> Generation {
        self.out.sort();
        self.out.dedup();
        Generation {
            occurrences: self.out,
            truncated: self.truncated,
        }
    }
}

/// The fixed starting point every step is measured from.
struct Anchor {
    tz: Tz,
    date: NaiveDate,
    time: NaiveTime,
    step: u32,
}

impl Anchor {
    /// Offset of step `i` in pattern units, or `None` on overflow.
    fn units(&self, i: u32) -> Option<u32> {
        i.checked_mul(self.step)
    }

    /// First day of the reference month.
    fn month_start(&self) -> Option<NaiveDate> {
        self.date.with_day(1)
    }
}

fn steps_exhausted(pattern: &str) {
    debug!(pattern, max_steps = MAX_STEPS, "step limit reached");
}

// ── Patterns ────────────────────────────────────────────────────────────────

fn daily(anchor: &Anchor, emitter: &mut Emitter) {
    for i in 0..MAX_STEPS {
        let Some(date) = anchor
            .units(i)
            .and_then(|days| anchor.date.checked_add_days(Days::new(u64::from(days))))
        else {
            return;
        };
        if emitter.offer_date(anchor, date) == Flow::Stop {
            return;
        }
    }
    steps_exhausted("daily");
}

/// Weeks start on Sunday, matching the 0 = Sunday weekday numbering.
fn weekly(anchor: &Anchor, weekdays: &[Weekday], emitter: &mut Emitter) {
    let back = u64::from(anchor.date.weekday().num_days_from_sunday());
    let Some(week_start) = anchor.date.checked_sub_days(Days::new(back)) else {
        return;
    };

    for i in 0..MAX_STEPS {
        let Some(week) = anchor
            .units(i)
            .and_then(|weeks| week_start.checked_add_days(Days::new(u64::from(weeks) * 7)))
        else {
            return;
        };
        let mut dates: Vec<NaiveDate> = weekdays
            .iter()
            .filter_map(|weekday| {
                week.checked_add_days(Days::new(u64::from(weekday.num_days_from_sunday())))
            })
            .collect();
        // A slot already passed in the first week moves one week later. With
        // an interval of 1 the next grid week already holds it.
        if i == 0 && anchor.step > 1 {
            for date in &mut dates {
                if emitter.is_past(anchor, *date) {
                    match date.checked_add_days(Days::new(7)) {
                        Some(next) => *date = next,
                        None => return,
                    }
                }
            }
            dates.sort();
        }
        for date in dates {
            if emitter.offer_date(anchor, date) == Flow::Stop {
                return;
            }
        }
    }
    steps_exhausted("weekly");
}

fn monthly_same_date(anchor: &Anchor, emitter: &mut Emitter) {
    for i in 0..MAX_STEPS {
        // checked_add_months clamps to the last day of shorter months.
        let Some(date) = anchor
            .units(i)
            .and_then(|months| anchor.date.checked_add_months(Months::new(months)))
        else {
            return;
        };
        if emitter.offer_date(anchor, date) == Flow::Stop {
            return;
        }
    }
    steps_exhausted("monthly same date");
}

fn monthly_specific_dates(anchor: &Anchor, dates: &[u32], emitter: &mut Emitter) {
    let Some(first) = anchor.month_start() else {
        return;
    };

    for i in 0..MAX_STEPS {
        let Some(month) = anchor
            .units(i)
            .and_then(|months| first.checked_add_months(Months::new(months)))
        else {
            return;
        };
        // Dates the month lacks (the 31st in April) are skipped.
        for date in dates.iter().filter_map(|&day| month.with_day(day)) {
            if emitter.offer_date(anchor, date) == Flow::Stop {
                return;
            }
        }
    }
    steps_exhausted("monthly specific dates");
}

fn monthly_day_of_week(anchor: &Anchor, emitter: &mut Emitter) {
    let Some(first) = anchor.month_start() else {
        return;
    };
    let weekday = anchor.date.weekday();
    let ordinal = ordinal_in_month(anchor.date);

    for i in 0..MAX_STEPS {
        let Some(month) = anchor
            .units(i)
            .and_then(|months| first.checked_add_months(Months::new(months)))
        else {
            return;
        };
        let Some(date) = nth_weekday_of_month(month, weekday, ordinal) else {
            continue;
        };
        if emitter.offer_date(anchor, date) == Flow::Stop {
            return;
        }
    }
    steps_exhausted("monthly day of week");
}

// ── Calendar helpers ────────────────────────────────────────────────────────

/// Which occurrence of its weekday `date` is within its month (1..=5).
fn ordinal_in_month(date: NaiveDate) -> u8 {
    // day is 1..=31, so the ordinal is 1..=5
    ((date.day() - 1) / 7 + 1) as u8
}

/// The `ordinal`-th `weekday` of the month containing `month`. An ordinal of
/// 5 means the last such weekday, since not every month has a fifth one.
fn nth_weekday_of_month(month: NaiveDate, weekday: Weekday, ordinal: u8) -> Option<NaiveDate> {
    if ordinal >= 5 {
        return last_weekday_of_month(month, weekday);
    }
    NaiveDate::from_weekday_of_month_opt(month.year(), month.month(), weekday, ordinal)
}

fn last_weekday_of_month(month: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let last_day = month
        .with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    let back = (7 + last_day.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    last_day.checked_sub_days(Days::new(u64::from(back)))
}
