//! Recurrence configuration: the immutable input to occurrence generation.
//!
//! The wire shape (camelCase JSON, every field optional with a default) is the
//! one the scheduling form submits and the backend stores. Only the
//! configuration is ever persisted; expanded occurrences are re-derived from
//! it on demand.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, Result};

// ── Enumerations ────────────────────────────────────────────────────────────

/// The recurrence family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Free-text pattern. Carries no machine-interpretable stepping rule.
    Custom,
}

/// How a monthly recurrence picks its day within each month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyPattern {
    /// Same day of month as the start date, clamped to short months.
    #[default]
    SameDate,
    /// Every date listed in `selected_month_dates`.
    SpecificDates,
    /// Same ordinal weekday as the start date ("2nd Tuesday").
    DayOfWeek,
}

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationRule {
    #[default]
    Never,
    ByDate,
    ByOccurrenceCount,
}

// ── RecurrenceConfig ────────────────────────────────────────────────────────

/// A recurring-meeting configuration as collected from the scheduling form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrenceConfig {
    /// When false, the meeting does not repeat.
    pub enabled: bool,
    pub pattern_type: PatternType,
    /// Step size in days, weeks or months depending on the pattern.
    pub interval: NonZeroU32,
    /// Weekly only: 0 = Sunday .. 6 = Saturday.
    pub selected_weekdays: BTreeSet<u8>,
    /// Monthly only.
    pub monthly_pattern: MonthlyPattern,
    /// Monthly with [`MonthlyPattern::SpecificDates`] only: days 1..=31.
    pub selected_month_dates: BTreeSet<u8>,
    /// Free-form description for [`PatternType::Custom`].
    pub custom_pattern_text: String,
    pub termination_rule: TerminationRule,
    /// Required when `termination_rule` is [`TerminationRule::ByDate`].
    pub end_date: Option<DateTime<Utc>>,
    /// Required when `termination_rule` is [`TerminationRule::ByOccurrenceCount`].
    pub max_occurrences: Option<NonZeroU32>,
    /// Wall-clock start time of each occurrence. Defaults to the time of day
    /// of the reference instant passed to generation.
    pub time_of_day: Option<NaiveTime>,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pattern_type: PatternType::Daily,
            interval: NonZeroU32::MIN,
            selected_weekdays: BTreeSet::new(),
            monthly_pattern: MonthlyPattern::SameDate,
            selected_month_dates: BTreeSet::new(),
            custom_pattern_text: String::new(),
            termination_rule: TerminationRule::Never,
            end_date: None,
            max_occurrences: None,
            time_of_day: None,
        }
    }
}

impl RecurrenceConfig {
    /// An enabled daily recurrence, every day, never ending.
    pub fn daily() -> Self {
        Self {
            enabled: true,
            pattern_type: PatternType::Daily,
            ..Self::default()
        }
    }

    /// An enabled weekly recurrence on the given weekdays (0 = Sunday).
    pub fn weekly(weekdays: impl IntoIterator<Item = u8>) -> Self {
        Self {
            enabled: true,
            pattern_type: PatternType::Weekly,
            selected_weekdays: weekdays.into_iter().collect(),
            ..Self::default()
        }
    }

    /// An enabled monthly recurrence using the given day-picking pattern.
    pub fn monthly(pattern: MonthlyPattern) -> Self {
        Self {
            enabled: true,
            pattern_type: PatternType::Monthly,
            monthly_pattern: pattern,
            ..Self::default()
        }
    }

    /// An enabled monthly recurrence on specific days of the month.
    pub fn monthly_on(dates: impl IntoIterator<Item = u8>) -> Self {
        Self {
            selected_month_dates: dates.into_iter().collect(),
            ..Self::monthly(MonthlyPattern::SpecificDates)
        }
    }

    /// An enabled custom recurrence described by free text.
    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            pattern_type: PatternType::Custom,
            custom_pattern_text: text.into(),
            ..Self::default()
        }
    }

    /// Set the step size.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::InvalidConfig`] for an interval of zero.
    pub fn with_interval(mut self, interval: u32) -> Result<Self> {
        self.interval = NonZeroU32::new(interval).ok_or_else(|| {
            RecurrenceError::InvalidConfig("interval must be at least 1".to_string())
        })?;
        Ok(self)
    }

    /// Stop after `count` occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::InvalidConfig`] for a count of zero.
    pub fn ending_after(mut self, count: u32) -> Result<Self> {
        self.max_occurrences = Some(NonZeroU32::new(count).ok_or_else(|| {
            RecurrenceError::InvalidConfig("occurrence count must be at least 1".to_string())
        })?);
        self.termination_rule = TerminationRule::ByOccurrenceCount;
        Ok(self)
    }

    /// Stop at `end` (inclusive).
    pub fn ending_on(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self.termination_rule = TerminationRule::ByDate;
        self
    }

    /// Start every occurrence at this wall-clock time.
    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time_of_day = Some(time);
        self
    }

    /// Turn the recurrence off without discarding the other selections.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Parse a configuration from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::InvalidConfig`] if the document is malformed,
    /// including an `interval` or `maxOccurrences` of zero.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RecurrenceError::InvalidConfig(e.to_string()))
    }

    /// Render the configuration in its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::InvalidConfig`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RecurrenceError::InvalidConfig(e.to_string()))
    }

    /// Selected weekdays that name a real day, in ascending 0..6 order.
    pub fn weekdays(&self) -> Vec<Weekday> {
        self.selected_weekdays
            .iter()
            .filter_map(|&d| weekday_from_index(d))
            .collect()
    }

    /// Selected month dates within 1..=31, ascending.
    pub fn month_dates(&self) -> Vec<u32> {
        self.selected_month_dates
            .iter()
            .filter(|&&d| (1..=31).contains(&d))
            .map(|&d| u32::from(d))
            .collect()
    }

    /// Check the configuration the way the scheduling form must before
    /// submitting it.
    ///
    /// Generation does not call this: it degrades to an empty sequence for
    /// the same inputs instead of failing.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, pattern fields before termination
    /// fields.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        match self.pattern_type {
            PatternType::Daily => {}
            PatternType::Weekly => {
                if self.selected_weekdays.is_empty() {
                    return Err(RecurrenceError::NoWeekdaysSelected);
                }
                if let Some(&bad) = self.selected_weekdays.iter().find(|&&d| d > 6) {
                    return Err(RecurrenceError::WeekdayOutOfRange(bad));
                }
            }
            PatternType::Monthly => {
                if self.monthly_pattern == MonthlyPattern::SpecificDates {
                    if self.selected_month_dates.is_empty() {
                        return Err(RecurrenceError::NoMonthDatesSelected);
                    }
                    if let Some(&bad) = self
                        .selected_month_dates
                        .iter()
                        .find(|&&d| !(1..=31).contains(&d))
                    {
                        return Err(RecurrenceError::MonthDateOutOfRange(bad));
                    }
                }
            }
            PatternType::Custom => {
                if self.custom_pattern_text.trim().is_empty() {
                    return Err(RecurrenceError::CustomPatternEmpty);
                }
            }
        }

        match self.termination_rule {
            TerminationRule::Never => Ok(()),
            TerminationRule::ByDate if self.end_date.is_none() => {
                Err(RecurrenceError::MissingEndDate)
            }
            TerminationRule::ByOccurrenceCount if self.max_occurrences.is_none() => {
                Err(RecurrenceError::MissingMaxOccurrences)
            }
            _ => Ok(()),
        }
    }
}

/// Map a 0 = Sunday .. 6 = Saturday index to a [`Weekday`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_is_disabled_daily() {
        let config = RecurrenceConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.pattern_type, PatternType::Daily);
        assert_eq!(config.interval.get(), 1);
        assert_eq!(config.termination_rule, TerminationRule::Never);
    }

    #[test]
    fn test_from_json_camel_case_wire_form() {
        let json = r#"{
            "enabled": true,
            "patternType": "weekly",
            "interval": 2,
            "selectedWeekdays": [5, 1, 3],
            "terminationRule": "byOccurrenceCount",
            "maxOccurrences": 6,
            "timeOfDay": "14:30:00"
        }"#;
        let config = RecurrenceConfig::from_json(json).unwrap();
        assert!(config.enabled);
        assert_eq!(config.pattern_type, PatternType::Weekly);
        assert_eq!(config.interval.get(), 2);
        assert_eq!(
            config.selected_weekdays.iter().copied().collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
        assert_eq!(config.termination_rule, TerminationRule::ByOccurrenceCount);
        assert_eq!(config.max_occurrences.map(NonZeroU32::get), Some(6));
        assert_eq!(config.time_of_day, NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn test_from_json_missing_fields_take_defaults() {
        let config = RecurrenceConfig::from_json(r#"{"enabled": true}"#).unwrap();
        assert_eq!(config.pattern_type, PatternType::Daily);
        assert_eq!(config.monthly_pattern, MonthlyPattern::SameDate);
        assert!(config.end_date.is_none());
    }

    #[test]
    fn test_from_json_rejects_zero_interval() {
        let err = RecurrenceConfig::from_json(r#"{"enabled": true, "interval": 0}"#).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_zero_max_occurrences() {
        let err =
            RecurrenceConfig::from_json(r#"{"enabled": true, "maxOccurrences": 0}"#).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_pattern() {
        let err = RecurrenceConfig::from_json(r#"{"patternType": "yearly"}"#).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidConfig(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let end = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let config = RecurrenceConfig::monthly_on([1, 15]).ending_on(end);
        let parsed = RecurrenceConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_to_json_uses_camel_case_wire_names() {
        let config = RecurrenceConfig::weekly([1]).ending_after(2).unwrap();
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["patternType"], "weekly");
        assert_eq!(json["terminationRule"], "byOccurrenceCount");
        assert_eq!(json["maxOccurrences"], 2);
    }

    #[test]
    fn test_with_interval_zero_is_rejected() {
        assert!(RecurrenceConfig::daily().with_interval(0).is_err());
        assert_eq!(
            RecurrenceConfig::daily().with_interval(3).unwrap().interval.get(),
            3
        );
    }

    #[test]
    fn test_ending_after_sets_rule() {
        let config = RecurrenceConfig::daily().ending_after(4).unwrap();
        assert_eq!(config.termination_rule, TerminationRule::ByOccurrenceCount);
        assert_eq!(config.max_occurrences.map(NonZeroU32::get), Some(4));
        assert!(RecurrenceConfig::daily().ending_after(0).is_err());
    }

    #[test]
    fn test_weekdays_skip_out_of_range() {
        let config = RecurrenceConfig::weekly([0, 3, 9]);
        assert_eq!(config.weekdays(), vec![Weekday::Sun, Weekday::Wed]);
    }

    #[test]
    fn test_month_dates_skip_out_of_range() {
        let config = RecurrenceConfig::monthly_on([0, 31, 12, 40]);
        assert_eq!(config.month_dates(), vec![12, 31]);
    }

    #[test]
    fn test_weekday_from_index_sunday_first() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }

    // ── validate ────────────────────────────────────────────────────────

    #[test]
    fn test_validate_disabled_always_ok() {
        let config = RecurrenceConfig::weekly([]).disabled();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_weekly_without_days() {
        let err = RecurrenceConfig::weekly([]).validate().unwrap_err();
        assert!(matches!(err, RecurrenceError::NoWeekdaysSelected));
    }

    #[test]
    fn test_validate_weekly_day_out_of_range() {
        let err = RecurrenceConfig::weekly([1, 7]).validate().unwrap_err();
        assert!(matches!(err, RecurrenceError::WeekdayOutOfRange(7)));
    }

    #[test]
    fn test_validate_specific_dates_empty() {
        let err = RecurrenceConfig::monthly_on([]).validate().unwrap_err();
        assert!(matches!(err, RecurrenceError::NoMonthDatesSelected));
    }

    #[test]
    fn test_validate_specific_date_out_of_range() {
        let err = RecurrenceConfig::monthly_on([32]).validate().unwrap_err();
        assert!(matches!(err, RecurrenceError::MonthDateOutOfRange(32)));
    }

    #[test]
    fn test_validate_same_date_ignores_month_dates() {
        assert!(RecurrenceConfig::monthly(MonthlyPattern::SameDate)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_by_date_requires_end_date() {
        let mut config = RecurrenceConfig::daily();
        config.termination_rule = TerminationRule::ByDate;
        assert!(matches!(
            config.validate().unwrap_err(),
            RecurrenceError::MissingEndDate
        ));
    }

    #[test]
    fn test_validate_by_count_requires_count() {
        let mut config = RecurrenceConfig::daily();
        config.termination_rule = TerminationRule::ByOccurrenceCount;
        assert!(matches!(
            config.validate().unwrap_err(),
            RecurrenceError::MissingMaxOccurrences
        ));
    }

    #[test]
    fn test_validate_custom_requires_text() {
        assert!(matches!(
            RecurrenceConfig::custom("  ").validate().unwrap_err(),
            RecurrenceError::CustomPatternEmpty
        ));
        assert!(RecurrenceConfig::custom("every other Thursday")
            .validate()
            .is_ok());
    }
}
