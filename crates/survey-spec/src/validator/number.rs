use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TextInputValidator;
use crate::answer_value::AnswerValue;
use crate::error::{InputError, InputErrorKind};
use crate::number_format::{NumberFormat, NumberFormatStyle};
use crate::picker::PickerSource;

const DEFAULT_INVALID_MESSAGE: &str = "The number entered is not valid.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberValueKind {
    Integer,
    Decimal,
}

/// Range and format policy shared by integer, decimal and year entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValidator {
    pub value_kind: NumberValueKind,
    pub format: NumberFormat,
    pub minimum_value: Option<Decimal>,
    pub maximum_value: Option<Decimal>,
    pub step_interval: Option<Decimal>,
    pub min_invalid_message: Option<String>,
    pub max_invalid_message: Option<String>,
    pub invalid_message: Option<String>,
}

impl NumberValidator {
    pub fn new(value_kind: NumberValueKind, format: NumberFormat) -> Self {
        Self {
            value_kind,
            format,
            minimum_value: None,
            maximum_value: None,
            step_interval: None,
            min_invalid_message: None,
            max_invalid_message: None,
            invalid_message: None,
        }
    }

    pub fn invalid_message(&self) -> &str {
        self.invalid_message
            .as_deref()
            .unwrap_or(DEFAULT_INVALID_MESSAGE)
    }

    /// Bounds are inclusive; the minimum is checked first.
    pub fn validate_number(&self, number: Decimal) -> Result<AnswerValue, InputError> {
        if let Some(minimum) = self.minimum_value
            && number < minimum
        {
            let message = self.min_invalid_message.clone().unwrap_or_else(|| {
                format!(
                    "Value must be greater than or equal to {}.",
                    self.format.format(minimum)
                )
            });
            return Err(InputError::new(
                InputErrorKind::LessThanMinimumValue(minimum),
                Some(self.format.format(number)),
                message,
            ));
        }
        if let Some(maximum) = self.maximum_value
            && number > maximum
        {
            let message = self.max_invalid_message.clone().unwrap_or_else(|| {
                format!(
                    "Value must be less than or equal to {}.",
                    self.format.format(maximum)
                )
            });
            return Err(InputError::new(
                InputErrorKind::GreaterThanMaximumValue(maximum),
                Some(self.format.format(number)),
                message,
            ));
        }
        Ok(self.convert(number))
    }

    // Missing or unreadable input is only acceptable when no bound is set.
    fn validate_missing(&self, text: Option<&str>) -> Result<(), InputError> {
        if self.minimum_value.is_some() || self.maximum_value.is_some() {
            Err(InputError::new(
                InputErrorKind::InvalidType,
                text.map(str::to_string),
                self.invalid_message(),
            ))
        } else {
            Ok(())
        }
    }

    fn convert(&self, number: Decimal) -> AnswerValue {
        match self.value_kind {
            NumberValueKind::Integer => {
                let whole = number.trunc();
                let saturated = if whole.is_sign_negative() {
                    i64::MIN
                } else {
                    i64::MAX
                };
                AnswerValue::Integer(whole.to_i64().unwrap_or(saturated))
            }
            NumberValueKind::Decimal => AnswerValue::Number(number.to_f64().unwrap_or_default()),
        }
    }

    pub fn picker_source(&self) -> PickerSource {
        PickerSource::Number {
            minimum: self.minimum_value.unwrap_or_default(),
            maximum: self.maximum_value.unwrap_or_default(),
            step_interval: self.step_interval,
            format: self.format.clone(),
        }
    }
}

fn decimal_from_answer(answer: &AnswerValue) -> Option<Decimal> {
    match answer {
        AnswerValue::Integer(number) => Some(Decimal::from(*number)),
        AnswerValue::Json(Value::Number(number)) => match number.as_i64() {
            Some(integer) => Some(Decimal::from(integer)),
            None => number.as_f64().and_then(Decimal::from_f64),
        },
        other => other.as_f64().and_then(Decimal::from_f64),
    }
}

impl TextInputValidator for NumberValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        answer
            .and_then(decimal_from_answer)
            .map(|number| self.format.format(number))
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        match text.and_then(|text| self.format.parse(text)) {
            Some(number) => self.validate_number(number).map(Some),
            None => self.validate_missing(text).map(|_| None),
        }
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        let Some(answer) = answer.filter(|answer| !answer.is_null()) else {
            return Ok(None);
        };
        if let Some(text) = answer.as_str() {
            return self.validate_text(Some(text));
        }
        match decimal_from_answer(answer) {
            Some(number) => self.validate_number(number).map(Some),
            None => Err(InputError::new(
                InputErrorKind::InvalidType,
                Some(answer.to_string()),
                self.invalid_message(),
            )),
        }
    }
}

/// Options for whole-number entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegerFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberFormatStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_grouping_separator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,
}

impl IntegerFormatOptions {
    pub fn number_validator(&self) -> NumberValidator {
        NumberValidator {
            value_kind: NumberValueKind::Integer,
            format: NumberFormat::new(
                self.number_style.unwrap_or_default(),
                self.uses_grouping_separator.unwrap_or(true),
                0,
            ),
            minimum_value: self.minimum_value.map(Decimal::from),
            maximum_value: self.maximum_value.map(Decimal::from),
            step_interval: self.step_interval.map(Decimal::from),
            min_invalid_message: self.min_invalid_message.clone(),
            max_invalid_message: self.max_invalid_message.clone(),
            invalid_message: self.invalid_message.clone(),
        }
    }
}

/// Options for decimal entry. At most two fraction digits unless set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoubleFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberFormatStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_grouping_separator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,
}

impl DoubleFormatOptions {
    pub fn number_validator(&self) -> NumberValidator {
        NumberValidator {
            value_kind: NumberValueKind::Decimal,
            format: NumberFormat::new(
                self.number_style.unwrap_or_default(),
                self.uses_grouping_separator.unwrap_or(true),
                self.maximum_fraction_digits.unwrap_or(2),
            ),
            minimum_value: self.minimum_value.and_then(Decimal::from_f64),
            maximum_value: self.maximum_value.and_then(Decimal::from_f64),
            step_interval: self.step_interval.and_then(Decimal::from_f64),
            min_invalid_message: self.min_invalid_message.clone(),
            max_invalid_message: self.max_invalid_message.clone(),
            invalid_message: self.invalid_message.clone(),
        }
    }
}

/// Options for year entry. Explicit year bounds win over the
/// `allowPast`/`allowFuture` flags, which bound the range at the current year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_future: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_past: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_invalid_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,
}

impl YearFormatOptions {
    pub fn minimum_year_for(&self, current_year: i32) -> Option<i32> {
        self.minimum_year
            .or_else(|| (self.allow_past == Some(false)).then_some(current_year))
    }

    pub fn maximum_year_for(&self, current_year: i32) -> Option<i32> {
        self.maximum_year
            .or_else(|| (self.allow_future == Some(false)).then_some(current_year))
    }

    pub fn number_validator_for(&self, current_year: i32) -> NumberValidator {
        NumberValidator {
            value_kind: NumberValueKind::Integer,
            format: NumberFormat::new(NumberFormatStyle::None, false, 0),
            minimum_value: self.minimum_year_for(current_year).map(Decimal::from),
            maximum_value: self.maximum_year_for(current_year).map(Decimal::from),
            step_interval: Some(Decimal::ONE),
            min_invalid_message: self.min_invalid_message.clone(),
            max_invalid_message: self.max_invalid_message.clone(),
            invalid_message: self.invalid_message.clone(),
        }
    }

    pub fn number_validator(&self) -> NumberValidator {
        self.number_validator_for(Local::now().year())
    }
}

macro_rules! delegate_to_number_validator {
    ($options:ty) => {
        impl TextInputValidator for $options {
            fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
                self.number_validator().answer_text(answer)
            }

            fn validate_text(
                &self,
                text: Option<&str>,
            ) -> Result<Option<AnswerValue>, InputError> {
                self.number_validator().validate_text(text)
            }

            fn validate_answer(
                &self,
                answer: Option<&AnswerValue>,
            ) -> Result<Option<AnswerValue>, InputError> {
                self.number_validator().validate_answer(answer)
            }
        }
    };
}

delegate_to_number_validator!(IntegerFormatOptions);
delegate_to_number_validator!(DoubleFormatOptions);
delegate_to_number_validator!(YearFormatOptions);
