use chrono::{DateTime, FixedOffset, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::TextInputValidator;
use crate::answer_value::AnswerValue;
use crate::date_format::{
    DateCoder, ISO8601_DATE_ONLY, ISO8601_TIME_ONLY, ISO8601_TIMESTAMP,
};
use crate::error::{ConfigError, InputError, InputErrorKind};
use crate::picker::PickerSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DatePickerMode {
    Date,
    Time,
    DateAndTime,
}

impl DatePickerMode {
    pub fn default_coding_format(&self) -> &'static str {
        match self {
            DatePickerMode::Date => ISO8601_DATE_ONLY,
            DatePickerMode::Time => ISO8601_TIME_ONLY,
            DatePickerMode::DateAndTime => ISO8601_TIMESTAMP,
        }
    }

    // en-US short styles
    fn display_pattern(&self) -> &'static str {
        match self {
            DatePickerMode::Date => "M/d/yyyy",
            DatePickerMode::Time => "h:mm a",
            DatePickerMode::DateAndTime => "M/d/yyyy, h:mm a",
        }
    }
}

/// `formatOptions` of date, time and date-time items. Dates are written in
/// `codingFormat`, or the picker mode's default coding format when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_future: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_past: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_date: Option<String>,
}

impl DateRange {
    pub fn coding_format(&self, mode: DatePickerMode) -> &str {
        self.coding_format
            .as_deref()
            .unwrap_or(mode.default_coding_format())
    }

    pub fn coder(&self, mode: DatePickerMode) -> Result<DateCoder, ConfigError> {
        DateCoder::new(self.coding_format(mode))
    }

    pub fn validate(&self, mode: DatePickerMode) -> Result<(), ConfigError> {
        let coder = self.coder(mode)?;
        let dates = [
            ("minimumDate", &self.minimum_date),
            ("maximumDate", &self.maximum_date),
            ("defaultDate", &self.default_date),
        ];
        for (key, date) in dates {
            if let Some(text) = date
                && coder.parse(text).is_none()
            {
                return Err(ConfigError::UnsupportedDateFormat {
                    pattern: coder.pattern().to_string(),
                    reason: format!("{key} '{text}' does not match"),
                });
            }
        }
        Ok(())
    }

    /// Explicit `minimumDate`, else `now` when past dates are not allowed.
    /// Time pickers are never bounded by `now`.
    pub fn minimum_date(
        &self,
        mode: DatePickerMode,
        now: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.parse_bound(mode, self.minimum_date.as_deref())
            .or_else(|| match (self.allow_past, mode) {
                (Some(false), DatePickerMode::Date) => Some(floating_day(now, NaiveTime::default())),
                (Some(false), DatePickerMode::DateAndTime) => Some(now),
                _ => None,
            })
    }

    /// Explicit `maximumDate`, else `now` when future dates are not allowed.
    pub fn maximum_date(
        &self,
        mode: DatePickerMode,
        now: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.parse_bound(mode, self.maximum_date.as_deref())
            .or_else(|| match (self.allow_future, mode) {
                (Some(false), DatePickerMode::Date) => Some(floating_day(now, end_of_day())),
                (Some(false), DatePickerMode::DateAndTime) => Some(now),
                _ => None,
            })
    }

    pub fn default_date(&self, mode: DatePickerMode) -> Option<DateTime<FixedOffset>> {
        self.parse_bound(mode, self.default_date.as_deref())
    }

    fn parse_bound(&self, mode: DatePickerMode, text: Option<&str>) -> Option<DateTime<FixedOffset>> {
        let coder = self.coder(mode).ok()?;
        text.and_then(|text| coder.parse(text))
    }
}

// Zone-less dates are read as UTC, so the participant's calendar day is
// pinned to UTC for comparison.
fn floating_day(now: DateTime<FixedOffset>, time: NaiveTime) -> DateTime<FixedOffset> {
    now.date_naive().and_time(time).and_utc().fixed_offset()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

/// Reads dates typed in the display format (or the coding format) and checks
/// them against the picker's range. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeValidator {
    pub picker_mode: DatePickerMode,
    pub minimum_date: Option<DateTime<FixedOffset>>,
    pub maximum_date: Option<DateTime<FixedOffset>>,
    pub minute_interval: Option<u32>,
    pub default_date: Option<DateTime<FixedOffset>>,
    coding: DateCoder,
    display: DateCoder,
}

impl DateTimeValidator {
    pub fn new(
        mode: DatePickerMode,
        range: &DateRange,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            picker_mode: mode,
            minimum_date: range.minimum_date(mode, now),
            maximum_date: range.maximum_date(mode, now),
            minute_interval: range.minute_interval,
            default_date: range.default_date(mode),
            coding: range.coder(mode)?,
            display: DateCoder::new(mode.display_pattern())?,
        })
    }

    pub fn coding_format(&self) -> &str {
        self.coding.pattern()
    }

    pub fn display_text(&self, date: &DateTime<FixedOffset>) -> String {
        self.display.format(date)
    }

    pub fn picker_source(&self) -> PickerSource {
        PickerSource::Date {
            mode: self.picker_mode,
            minimum_date: self.minimum_date,
            maximum_date: self.maximum_date,
            minute_interval: self.minute_interval,
            default_date: self.default_date,
        }
    }

    fn parse_text(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        self.display
            .parse(text)
            .or_else(|| self.coding.parse(text))
    }

    fn check_range(&self, date: DateTime<FixedOffset>) -> Result<AnswerValue, InputError> {
        if let Some(minimum) = self.minimum_date
            && date < minimum
        {
            return Err(InputError::new(
                InputErrorKind::LessThanMinimumDate(minimum),
                Some(self.display.format(&date)),
                format!(
                    "The date entered must be on or after {}.",
                    self.display.format(&minimum)
                ),
            ));
        }
        if let Some(maximum) = self.maximum_date
            && date > maximum
        {
            return Err(InputError::new(
                InputErrorKind::GreaterThanMaximumDate(maximum),
                Some(self.display.format(&date)),
                format!(
                    "The date entered must be on or before {}.",
                    self.display.format(&maximum)
                ),
            ));
        }
        Ok(AnswerValue::DateTime(date))
    }
}

impl TextInputValidator for DateTimeValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        match answer? {
            AnswerValue::DateTime(date) => Some(self.display.format(date)),
            other => other
                .as_str()
                .and_then(|text| self.coding.parse(text))
                .map(|date| self.display.format(&date)),
        }
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        match self.parse_text(text) {
            Some(date) => self.check_range(date).map(Some),
            None => Err(InputError::new(
                InputErrorKind::InvalidFormat,
                Some(text.to_string()),
                "The date entered is not valid.",
            )),
        }
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        let Some(answer) = answer.filter(|answer| !answer.is_null()) else {
            return Ok(None);
        };
        if let Some(date) = answer.as_date_time() {
            return self.check_range(*date).map(Some);
        }
        match answer.as_str() {
            Some(text) => self.validate_text(Some(text)),
            None => Err(InputError::new(
                InputErrorKind::InvalidType,
                Some(answer.to_string()),
                "The answer is not a date.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(7 * 3600)
            .expect("offset")
            .with_ymd_and_hms(2020, 6, 15, 10, 30, 0)
            .single()
            .expect("date")
    }

    #[test]
    fn disallowing_past_bounds_date_pickers_at_start_of_today() {
        let range = DateRange {
            allow_past: Some(false),
            ..DateRange::default()
        };
        let validator =
            DateTimeValidator::new(DatePickerMode::Date, &range, now()).expect("validator");
        assert!(validator.validate_text(Some("6/15/2020")).is_ok());
        let err = validator
            .validate_text(Some("6/14/2020"))
            .expect_err("yesterday");
        assert_eq!(err.code(), "min_date");
    }

    #[test]
    fn explicit_bounds_use_the_coding_format() {
        let range = DateRange {
            minimum_date: Some("2020-01-01".into()),
            maximum_date: Some("2020-12-31".into()),
            ..DateRange::default()
        };
        let validator =
            DateTimeValidator::new(DatePickerMode::Date, &range, now()).expect("validator");
        assert!(validator.validate_text(Some("2020-12-31")).is_ok());
        let err = validator
            .validate_text(Some("1/1/2021"))
            .expect_err("after maximum");
        assert_eq!(err.code(), "max_date");
    }

    #[test]
    fn garbage_is_a_format_error() {
        let validator =
            DateTimeValidator::new(DatePickerMode::Time, &DateRange::default(), now())
                .expect("validator");
        let err = validator
            .validate_text(Some("noon-ish"))
            .expect_err("unreadable");
        assert_eq!(err.kind, InputErrorKind::InvalidFormat);
        let answer = validator
            .validate_text(Some("8:30 PM"))
            .expect("valid")
            .expect("answer");
        assert_eq!(validator.answer_text(Some(&answer)).as_deref(), Some("8:30 PM"));
    }
}
