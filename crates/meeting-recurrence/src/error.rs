//! Error types for meeting-recurrence operations.
//!
//! Occurrence generation itself never fails; these errors come from the
//! construction boundary (parsing, validation) and from RRULE export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Invalid recurrence config: {0}")]
    InvalidConfig(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Weekly recurrence needs at least one selected weekday")]
    NoWeekdaysSelected,

    #[error("Weekday {0} is out of range (expected 0=Sunday..6=Saturday)")]
    WeekdayOutOfRange(u8),

    #[error("Monthly recurrence on specific dates needs at least one selected date")]
    NoMonthDatesSelected,

    #[error("Day of month {0} is out of range (expected 1..31)")]
    MonthDateOutOfRange(u8),

    #[error("Recurrence ending by date has no end date")]
    MissingEndDate,

    #[error("Recurrence ending after a number of occurrences has no occurrence count")]
    MissingMaxOccurrences,

    #[error("Custom recurrence has no description")]
    CustomPatternEmpty,

    #[error("Unsupported recurrence: {0}")]
    Unsupported(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, RecurrenceError>;
