use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json;
use crate::units::MeasurementUnit;

/// A physical quantity with the unit it was recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Re-expresses the measurement in `unit`. Fails for unknown units or
    /// units of a different dimension.
    pub fn converted_to(&self, unit: &str) -> Option<Measurement> {
        if self.unit == unit {
            return Some(self.clone());
        }
        let from = MeasurementUnit::from_symbol(&self.unit)?;
        let to = MeasurementUnit::from_symbol(unit)?;
        MeasurementUnit::convert(self.value, from, to).map(|value| Measurement::new(value, unit))
    }
}

/// Native in-memory form of an answer, as produced by `AnswerType::decode_answer`
/// and consumed by `AnswerType::encode_answer`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
    DateTime(DateTime<FixedOffset>),
    Measurement(Measurement),
    Json(Value),
}

impl AnswerValue {
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Boolean(flag) => Value::Bool(*flag),
            AnswerValue::Integer(number) => Value::from(*number),
            AnswerValue::Number(number) => Value::from(*number),
            AnswerValue::String(text) => Value::String(text.clone()),
            AnswerValue::Array(items) => Value::Array(items.clone()),
            AnswerValue::Object(map) => Value::Object(map.clone()),
            AnswerValue::DateTime(date) => {
                Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, false))
            }
            AnswerValue::Measurement(measurement) => Value::from(measurement.value),
            AnswerValue::Json(value) => value.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::Integer(_) => "integer",
            AnswerValue::Number(_) => "number",
            AnswerValue::String(_) => "string",
            AnswerValue::Array(_) => "array",
            AnswerValue::Object(_) => "object",
            AnswerValue::DateTime(_) => "date-time",
            AnswerValue::Measurement(_) => "measurement",
            AnswerValue::Json(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::String(text) => Some(text),
            AnswerValue::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(number) => Some(*number as f64),
            AnswerValue::Number(number) => Some(*number),
            AnswerValue::Measurement(measurement) => Some(measurement.value),
            AnswerValue::Json(Value::Number(number)) => number.as_f64(),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AnswerValue::DateTime(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_measurement(&self) -> Option<&Measurement> {
        match self {
            AnswerValue::Measurement(measurement) => Some(measurement),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnswerValue::Json(Value::Null))
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Boolean(flag) => write!(f, "{flag}"),
            AnswerValue::Integer(number) => write!(f, "{number}"),
            AnswerValue::Number(number) => write!(f, "{number}"),
            AnswerValue::String(text) => f.write_str(text),
            AnswerValue::DateTime(date) => {
                f.write_str(&date.to_rfc3339_opts(SecondsFormat::Millis, false))
            }
            AnswerValue::Measurement(measurement) => {
                write!(f, "{} {}", measurement.value, measurement.unit)
            }
            other => f.write_str(&json::describe(&other.to_json())),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Boolean(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Integer(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::String(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::String(value)
    }
}

impl From<Measurement> for AnswerValue {
    fn from(value: Measurement) -> Self {
        AnswerValue::Measurement(value)
    }
}

impl From<DateTime<FixedOffset>> for AnswerValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        AnswerValue::DateTime(value)
    }
}

impl From<Value> for AnswerValue {
    fn from(value: Value) -> Self {
        AnswerValue::Json(value)
    }
}
