use std::borrow::Cow;

use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use super::TextInputValidator;
use crate::answer_value::AnswerValue;
use crate::error::{ConfigError, InputError, InputErrorKind};

/// Accepts text only when the pattern matches it exactly once, across the
/// whole string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RegExValidatorRepr", into = "RegExValidatorRepr")]
pub struct RegExValidator {
    regex: Regex,
    invalid_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegExValidatorRepr {
    pattern: String,
    invalid_message: String,
}

impl RegExValidator {
    pub fn new(pattern: &str, invalid_message: impl Into<String>) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            regex,
            invalid_message: invalid_message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn invalid_message(&self) -> &str {
        &self.invalid_message
    }

    pub fn matches(&self, text: &str) -> bool {
        let mut found = self.regex.find_iter(text);
        match (found.next(), found.next()) {
            (Some(only), None) => only.start() == 0 && only.end() == text.len(),
            _ => false,
        }
    }

    fn check(&self, text: &str) -> Result<AnswerValue, InputError> {
        if self.matches(text) {
            Ok(AnswerValue::from(text))
        } else {
            Err(InputError::new(
                InputErrorKind::InvalidRegex,
                Some(text.to_string()),
                self.invalid_message.clone(),
            ))
        }
    }
}

impl PartialEq for RegExValidator {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern() && self.invalid_message == other.invalid_message
    }
}

impl TryFrom<RegExValidatorRepr> for RegExValidator {
    type Error = ConfigError;

    fn try_from(repr: RegExValidatorRepr) -> Result<Self, Self::Error> {
        RegExValidator::new(&repr.pattern, repr.invalid_message)
    }
}

impl From<RegExValidator> for RegExValidatorRepr {
    fn from(validator: RegExValidator) -> Self {
        RegExValidatorRepr {
            pattern: validator.regex.as_str().to_string(),
            invalid_message: validator.invalid_message,
        }
    }
}

impl JsonSchema for RegExValidator {
    fn schema_name() -> Cow<'static, str> {
        "RegExValidator".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        RegExValidatorRepr::json_schema(generator)
    }
}

impl TextInputValidator for RegExValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        answer
            .filter(|answer| !answer.is_null())
            .map(ToString::to_string)
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        match text {
            Some(text) => self.check(text).map(Some),
            None => Err(InputError::new(
                InputErrorKind::InvalidRegex,
                None,
                self.invalid_message.clone(),
            )),
        }
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        match answer.filter(|answer| !answer.is_null()) {
            Some(answer) => self.check(&answer.to_string()).map(Some),
            None => Ok(None),
        }
    }
}

/// Free text with an optional length limit and pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct StringValidator {
    pub max_length: Option<usize>,
    pub reg_ex: Option<RegExValidator>,
}

impl StringValidator {
    fn check(&self, text: &str) -> Result<AnswerValue, InputError> {
        if let Some(max_length) = self.max_length
            && text.chars().count() > max_length
        {
            return Err(InputError::new(
                InputErrorKind::ExceedsMaxLength(max_length),
                Some(text.to_string()),
                format!("The text entered is longer than {max_length} characters."),
            ));
        }
        match &self.reg_ex {
            Some(reg_ex) => reg_ex.check(text),
            None => Ok(AnswerValue::from(text)),
        }
    }
}

impl TextInputValidator for StringValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        answer
            .filter(|answer| !answer.is_null())
            .map(ToString::to_string)
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        match (text, &self.reg_ex) {
            (Some(text), _) => self.check(text).map(Some),
            (None, Some(reg_ex)) => reg_ex.validate_text(None),
            (None, None) => Ok(None),
        }
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        match answer.filter(|answer| !answer.is_null()) {
            Some(answer) => self.check(&answer.to_string()).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> RegExValidator {
        RegExValidator::new("^[0-9]*$", "Only digits are allowed.").expect("pattern")
    }

    #[test]
    fn full_single_match_is_accepted() {
        let validator = digits();
        assert_eq!(
            validator.validate_text(Some("12345")).expect("valid"),
            Some(AnswerValue::from("12345"))
        );
    }

    #[test]
    fn partial_or_repeated_matches_are_rejected() {
        let err = digits()
            .validate_text(Some("12a45"))
            .expect_err("letters are rejected");
        assert_eq!(err.kind, InputErrorKind::InvalidRegex);
        assert_eq!(err.message, "Only digits are allowed.");

        let unanchored = RegExValidator::new("[0-9]+", "digits").expect("pattern");
        assert!(!unanchored.matches("12a45"));
        assert!(!unanchored.matches("abc123"));
        assert!(unanchored.matches("123"));
    }

    #[test]
    fn bad_pattern_is_configuration_error() {
        assert!(matches!(
            RegExValidator::new("([0-9]", "never"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn string_validator_checks_length_before_pattern() {
        let validator = StringValidator {
            max_length: Some(4),
            reg_ex: Some(digits()),
        };
        let err = validator
            .validate_text(Some("123456"))
            .expect_err("too long");
        assert_eq!(err.code(), "max_length");
        assert!(validator.validate_text(Some("1234")).is_ok());
    }
}
