//! Text input validators: convert between the text a participant types and
//! the native answer value, rejecting input that is out of range or malformed.

mod date;
mod measurement;
mod number;
mod pattern;

pub use date::{DatePickerMode, DateRange, DateTimeValidator};
pub use measurement::{MeasurementKind, MeasurementValidator};
pub use number::{
    DoubleFormatOptions, IntegerFormatOptions, NumberValidator, NumberValueKind,
    YearFormatOptions,
};
pub use pattern::{RegExValidator, StringValidator};

use crate::answer_value::AnswerValue;
use crate::error::InputError;

pub trait TextInputValidator {
    /// Text to show for an existing answer, if any.
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String>;

    /// Validates participant text and converts it into an answer value.
    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError>;

    /// Validates an answer value that did not come from text entry.
    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError>;
}

/// Accepts everything unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassThruValidator;

impl TextInputValidator for PassThruValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        answer
            .filter(|answer| !answer.is_null())
            .map(ToString::to_string)
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        Ok(text.map(AnswerValue::from))
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        Ok(answer.cloned())
    }
}

/// The validator an input item hands to its text field.
#[derive(Debug, Clone, PartialEq)]
pub enum TextValidator {
    PassThru(PassThruValidator),
    RegEx(RegExValidator),
    String(StringValidator),
    Number(NumberValidator),
    DateTime(DateTimeValidator),
    Measurement(MeasurementValidator),
}

impl TextValidator {
    fn inner(&self) -> &dyn TextInputValidator {
        match self {
            TextValidator::PassThru(validator) => validator,
            TextValidator::RegEx(validator) => validator,
            TextValidator::String(validator) => validator,
            TextValidator::Number(validator) => validator,
            TextValidator::DateTime(validator) => validator,
            TextValidator::Measurement(validator) => validator,
        }
    }
}

impl Default for TextValidator {
    fn default() -> Self {
        TextValidator::PassThru(PassThruValidator)
    }
}

impl TextInputValidator for TextValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        self.inner().answer_text(answer)
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        self.inner().validate_text(text).inspect_err(|err| {
            tracing::debug!(code = err.code(), message = %err.message, "text input rejected");
        })
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        self.inner().validate_answer(answer).inspect_err(|err| {
            tracing::debug!(code = err.code(), message = %err.message, "answer rejected");
        })
    }
}
