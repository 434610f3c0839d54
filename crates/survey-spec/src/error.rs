use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::json::JsonType;

/// Raised when a value does not have the JSON or native shape an answer type
/// requires.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("answer type '{type_name}' cannot decode a {found} value")]
    Decoding {
        type_name: &'static str,
        found: JsonType,
    },
    #[error("answer type '{type_name}' cannot encode {value}")]
    Encoding {
        type_name: &'static str,
        value: String,
    },
}

/// Raised when a definition is internally inconsistent. Always fatal to the
/// decode that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("choice {index} has a {found} value but the choice list is {expected}")]
    ChoiceTypeMismatch {
        index: usize,
        expected: JsonType,
        found: JsonType,
    },
    #[error("an array answer type with separator '{separator}' needs a scalar base type, not {base_type}")]
    SeparatorWithNonScalarBase {
        separator: String,
        base_type: JsonType,
    },
    #[error("an array answer type cannot use an empty sequence separator")]
    EmptySeparator,
    #[error("identifier '{0}' is used by more than one input item")]
    DuplicateIdentifier(String),
    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("unsupported date format '{pattern}': {reason}")]
    UnsupportedDateFormat { pattern: String, reason: String },
    #[error("unknown {kind} type '{type_name}'")]
    UnknownType {
        kind: &'static str,
        type_name: String,
    },
    #[error("{kind} definition is missing its \"type\" discriminator")]
    MissingType { kind: &'static str },
    #[error("invalid survey rule: {0}")]
    InvalidSurveyRule(&'static str),
}

/// Why a text input validator rejected participant input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputErrorKind {
    LessThanMinimumValue(Decimal),
    GreaterThanMaximumValue(Decimal),
    LessThanMinimumDate(DateTime<FixedOffset>),
    GreaterThanMaximumDate(DateTime<FixedOffset>),
    InvalidRegex,
    ExceedsMaxLength(usize),
    InvalidType,
    InvalidFormat,
}

impl InputErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            InputErrorKind::LessThanMinimumValue(_) => "min",
            InputErrorKind::GreaterThanMaximumValue(_) => "max",
            InputErrorKind::LessThanMinimumDate(_) => "min_date",
            InputErrorKind::GreaterThanMaximumDate(_) => "max_date",
            InputErrorKind::InvalidRegex => "pattern_mismatch",
            InputErrorKind::ExceedsMaxLength(_) => "max_length",
            InputErrorKind::InvalidType => "type_mismatch",
            InputErrorKind::InvalidFormat => "invalid_format",
        }
    }
}

/// Participant input rejected by a validator. The message is the one shown to
/// the participant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct InputError {
    pub kind: InputErrorKind,
    pub value: Option<String>,
    pub message: String,
}

impl InputError {
    pub fn new(kind: InputErrorKind, value: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Errors from the decode entry points of definitions and results.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to parse definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
