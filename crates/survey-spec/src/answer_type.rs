use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::answer_value::{AnswerValue, Measurement};
use crate::date_format::{DateCoder, ISO8601_TIMESTAMP};
use crate::error::{ConfigError, ShapeError, SpecError};
use crate::json::{
    self, JsonType, parse_flag, parse_leading_double, parse_leading_integer, parse_truthy,
};

/// Describes how the answer to a question is stored as JSON and how it is
/// converted to and from its native form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case", try_from = "AnswerTypeRepr")]
pub enum AnswerType {
    Object,
    String,
    Boolean,
    Integer,
    Number,
    Null,
    Array(ArrayAnswerType),
    DateTime(DateTimeAnswerType),
    Measurement(MeasurementAnswerType),
}

// Decoded shape before `validate` runs.
#[derive(Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum AnswerTypeRepr {
    Object,
    String,
    Boolean,
    Integer,
    Number,
    Null,
    Array(ArrayAnswerType),
    DateTime(DateTimeAnswerType),
    Measurement(MeasurementAnswerType),
}

impl TryFrom<AnswerTypeRepr> for AnswerType {
    type Error = ConfigError;

    fn try_from(repr: AnswerTypeRepr) -> Result<Self, Self::Error> {
        let answer_type = match repr {
            AnswerTypeRepr::Object => AnswerType::Object,
            AnswerTypeRepr::String => AnswerType::String,
            AnswerTypeRepr::Boolean => AnswerType::Boolean,
            AnswerTypeRepr::Integer => AnswerType::Integer,
            AnswerTypeRepr::Number => AnswerType::Number,
            AnswerTypeRepr::Null => AnswerType::Null,
            AnswerTypeRepr::Array(array) => AnswerType::Array(array),
            AnswerTypeRepr::DateTime(date_time) => AnswerType::DateTime(date_time),
            AnswerTypeRepr::Measurement(measurement) => AnswerType::Measurement(measurement),
        };
        answer_type.validate().inspect_err(|err| {
            tracing::warn!(error = %err, "rejecting answer type definition");
        })?;
        Ok(answer_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrayAnswerType {
    #[serde(default = "default_array_base_type")]
    pub base_type: JsonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_separator: Option<String>,
}

fn default_array_base_type() -> JsonType {
    JsonType::String
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeAnswerType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MeasurementAnswerType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl DateTimeAnswerType {
    pub fn coding_format(&self) -> &str {
        self.coding_format.as_deref().unwrap_or(ISO8601_TIMESTAMP)
    }

    pub fn coder(&self) -> Result<DateCoder, ConfigError> {
        match &self.coding_format {
            Some(pattern) => DateCoder::new(pattern),
            None => Ok(DateCoder::iso8601_timestamp()),
        }
    }
}

impl ArrayAnswerType {
    fn decode_items(&self, value: &Value) -> Option<Vec<Value>> {
        match (value, &self.sequence_separator) {
            (Value::String(text), Some(separator)) => text
                .split(separator.as_str())
                .map(|component| self.coerce_component(component))
                .collect(),
            (Value::Array(items), _) => Some(items.clone()),
            _ => None,
        }
    }

    fn coerce_component(&self, component: &str) -> Option<Value> {
        match self.base_type {
            JsonType::Integer => Some(Value::from(parse_leading_integer(component))),
            JsonType::Number => Some(Value::from(parse_leading_double(component))),
            JsonType::Boolean => Some(Value::Bool(parse_truthy(component))),
            JsonType::String => Some(Value::String(component.to_string())),
            _ => None,
        }
    }

    fn encode_items(&self, value: &AnswerValue) -> Value {
        let items = match value.to_json() {
            Value::Null => return Value::Null,
            Value::Array(items) => items,
            scalar => vec![scalar],
        };
        match &self.sequence_separator {
            Some(separator) => Value::String(
                items
                    .iter()
                    .map(json::describe)
                    .collect::<Vec<_>>()
                    .join(separator),
            ),
            None => Value::Array(items),
        }
    }
}

impl AnswerType {
    pub fn array(base_type: JsonType) -> Self {
        AnswerType::Array(ArrayAnswerType {
            base_type,
            sequence_separator: None,
        })
    }

    pub fn array_with_separator(base_type: JsonType, separator: impl Into<String>) -> Self {
        AnswerType::Array(ArrayAnswerType {
            base_type,
            sequence_separator: Some(separator.into()),
        })
    }

    pub fn date_time(coding_format: Option<&str>) -> Self {
        AnswerType::DateTime(DateTimeAnswerType {
            coding_format: coding_format.map(str::to_string),
        })
    }

    pub fn measurement(unit: Option<&str>) -> Self {
        AnswerType::Measurement(MeasurementAnswerType {
            unit: unit.map(str::to_string),
        })
    }

    /// Default answer type for values of a JSON shape.
    pub fn from_json_type(json_type: JsonType) -> Self {
        match json_type {
            JsonType::Null => AnswerType::Null,
            JsonType::Boolean => AnswerType::Boolean,
            JsonType::Integer => AnswerType::Integer,
            JsonType::Number => AnswerType::Number,
            JsonType::String => AnswerType::String,
            JsonType::Array => AnswerType::array(JsonType::String),
            JsonType::Object => AnswerType::Object,
        }
    }

    /// Answer type for a value stored without one. Arrays are typed by their
    /// elements: all integers, all numbers, all strings, otherwise objects.
    pub fn infer(value: &Value) -> Self {
        let Value::Array(items) = value else {
            return AnswerType::from_json_type(JsonType::of(value));
        };
        let base_type = if items.iter().all(|item| item.is_i64() || item.is_u64()) {
            JsonType::Integer
        } else if items.iter().all(Value::is_number) {
            JsonType::Number
        } else if items.iter().all(Value::is_string) {
            JsonType::String
        } else {
            JsonType::Object
        };
        AnswerType::array(base_type)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AnswerType::Object => "object",
            AnswerType::String => "string",
            AnswerType::Boolean => "boolean",
            AnswerType::Integer => "integer",
            AnswerType::Number => "number",
            AnswerType::Null => "null",
            AnswerType::Array(_) => "array",
            AnswerType::DateTime(_) => "date-time",
            AnswerType::Measurement(_) => "measurement",
        }
    }

    pub fn type_names() -> [&'static str; 9] {
        [
            "object",
            "string",
            "boolean",
            "integer",
            "number",
            "null",
            "array",
            "date-time",
            "measurement",
        ]
    }

    /// JSON shape of an encoded answer.
    pub fn base_type(&self) -> JsonType {
        match self {
            AnswerType::Object => JsonType::Object,
            AnswerType::String | AnswerType::DateTime(_) => JsonType::String,
            AnswerType::Boolean => JsonType::Boolean,
            AnswerType::Integer => JsonType::Integer,
            AnswerType::Number | AnswerType::Measurement(_) => JsonType::Number,
            AnswerType::Null => JsonType::Null,
            AnswerType::Array(array) if array.sequence_separator.is_some() => JsonType::String,
            AnswerType::Array(_) => JsonType::Array,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AnswerType::Array(ArrayAnswerType {
                sequence_separator: Some(separator),
                ..
            }) if separator.is_empty() => Err(ConfigError::EmptySeparator),
            AnswerType::Array(ArrayAnswerType {
                base_type,
                sequence_separator: Some(separator),
            }) if !base_type.is_scalar() => Err(ConfigError::SeparatorWithNonScalarBase {
                separator: separator.clone(),
                base_type: *base_type,
            }),
            AnswerType::DateTime(date_time) => date_time.coder().map(|_| ()),
            _ => Ok(()),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let repr: AnswerTypeRepr = serde_json::from_value(value)?;
        Ok(AnswerType::try_from(repr)?)
    }

    /// Converts a stored JSON value into the canonical JSON shape of this
    /// type, applying the lenient coercions.
    pub fn decode_value(&self, value: &Value) -> Result<Value, ShapeError> {
        if let AnswerType::Null = self {
            return Err(self.decoding_error(value));
        }
        if value.is_null() {
            return Ok(Value::Null);
        }
        let decoded = match self {
            AnswerType::Object => value.is_object().then(|| value.clone()),
            AnswerType::String => scalar_text(value).map(Value::String),
            AnswerType::Boolean => coerce_bool(value).map(Value::Bool),
            AnswerType::Integer => coerce_integer(value).map(Value::from),
            AnswerType::Number | AnswerType::Measurement(_) => coerce_number(value).map(Value::from),
            AnswerType::Array(array) => array.decode_items(value).map(Value::Array),
            AnswerType::DateTime(_) => value.is_string().then(|| value.clone()),
            AnswerType::Null => None,
        };
        decoded.ok_or_else(|| self.decoding_error(value))
    }

    /// Converts a stored JSON value into its native form. Absent or null
    /// values decode to `None`, as do date strings that do not match the
    /// coding format.
    pub fn decode_answer(&self, value: Option<&Value>) -> Result<Option<AnswerValue>, ShapeError> {
        if let AnswerType::Null = self {
            return Err(self.decoding_error(value.unwrap_or(&Value::Null)));
        }
        let Some(value) = value.filter(|value| !value.is_null()) else {
            return Ok(None);
        };

        let answer = match self {
            AnswerType::Object => value.as_object().cloned().map(AnswerValue::Object),
            AnswerType::String => scalar_text(value).map(AnswerValue::String),
            AnswerType::Boolean => coerce_bool(value).map(AnswerValue::Boolean),
            AnswerType::Integer => coerce_integer(value).map(AnswerValue::Integer),
            AnswerType::Number => coerce_number(value).map(AnswerValue::Number),
            AnswerType::Array(array) => array.decode_items(value).map(AnswerValue::Array),
            AnswerType::Measurement(measurement) => {
                coerce_number(value).map(|number| match &measurement.unit {
                    Some(unit) => AnswerValue::Measurement(Measurement::new(number, unit)),
                    None => AnswerValue::Number(number),
                })
            }
            AnswerType::DateTime(date_time) => {
                let Value::String(text) = value else {
                    return Err(self.decoding_error(value));
                };
                let coder = date_time
                    .coder()
                    .map_err(|_| self.decoding_error(value))?;
                let date = coder.parse(text);
                if date.is_none() {
                    tracing::debug!(
                        pattern = coder.pattern(),
                        text = %text,
                        "date does not match coding format"
                    );
                }
                return Ok(date.map(AnswerValue::DateTime));
            }
            AnswerType::Null => None,
        };
        answer.map(Some).ok_or_else(|| self.decoding_error(value))
    }

    /// Converts a native value into the JSON stored for this type. `None`
    /// encodes as JSON null.
    pub fn encode_answer(&self, value: Option<&AnswerValue>) -> Result<Value, ShapeError> {
        let Some(value) = value else {
            return Ok(Value::Null);
        };
        match self {
            AnswerType::Null => Ok(Value::Null),
            AnswerType::Array(array) => Ok(array.encode_items(value)),
            AnswerType::DateTime(date_time) => match value {
                AnswerValue::DateTime(date) => {
                    let coder = date_time
                        .coder()
                        .map_err(|_| self.encoding_error(value))?;
                    Ok(Value::String(coder.format(date)))
                }
                other => match other.as_str() {
                    Some(text) => Ok(Value::String(text.to_string())),
                    None if other.is_null() => Ok(Value::Null),
                    None => Err(self.encoding_error(value)),
                },
            },
            AnswerType::Measurement(MeasurementAnswerType { unit: Some(unit) }) => match value {
                AnswerValue::Measurement(measurement) => measurement
                    .converted_to(unit)
                    .map(|converted| Value::from(converted.value))
                    .ok_or_else(|| self.encoding_error(value)),
                other => self.coerce_encoded(other),
            },
            _ => self.coerce_encoded(value),
        }
    }

    // Text is only encoded as a flag or number when all of it parses.
    fn coerce_encoded(&self, value: &AnswerValue) -> Result<Value, ShapeError> {
        let json = value.to_json();
        if let Value::String(text) = &json
            && !self.reads_whole_text(text)
        {
            return Err(self.encoding_error(value));
        }
        self.decode_value(&json)
            .map_err(|_| self.encoding_error(value))
    }

    fn reads_whole_text(&self, text: &str) -> bool {
        match self {
            AnswerType::Boolean => parse_flag(text).is_some(),
            AnswerType::Integer => text.trim().parse::<i64>().is_ok(),
            AnswerType::Number | AnswerType::Measurement(_) => {
                text.trim().parse::<f64>().is_ok_and(f64::is_finite)
            }
            _ => true,
        }
    }

    /// A documented example value for each answer type.
    pub fn examples() -> Vec<(AnswerType, Value)> {
        vec![
            (AnswerType::Object, json!({ "foo": "ba" })),
            (AnswerType::String, json!("foo")),
            (AnswerType::Boolean, json!(true)),
            (AnswerType::Integer, json!(42)),
            (AnswerType::Number, json!(3.14)),
            (AnswerType::array(JsonType::Number), json!([3.2, 5.1])),
            (AnswerType::array(JsonType::Integer), json!([1, 5])),
            (
                AnswerType::array(JsonType::String),
                json!(["foo", "ba", "lalala"]),
            ),
            (
                AnswerType::array_with_separator(JsonType::Integer, ","),
                json!("1,5"),
            ),
            (AnswerType::date_time(Some("yyyy-MM")), json!("2020-04")),
            (AnswerType::date_time(Some("HH:mm")), json!("08:30")),
            (
                AnswerType::date_time(None),
                json!("2017-10-16T22:28:09.000-07:00"),
            ),
            (AnswerType::measurement(Some("cm")), json!(170.2)),
        ]
    }

    fn decoding_error(&self, value: &Value) -> ShapeError {
        ShapeError::Decoding {
            type_name: self.type_name(),
            found: JsonType::of(value),
        }
    }

    fn encoding_error(&self, value: &AnswerValue) -> ShapeError {
        ShapeError::Encoding {
            type_name: self.type_name(),
            value: format!("{} value '{value}'", value.kind()),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Bool(_) | Value::Number(_) => Some(json::describe(value)),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number
            .as_i64()
            .map(|integer| integer != 0)
            .or_else(|| number.as_f64().map(|float| float != 0.0)),
        Value::String(text) => Some(parse_truthy(text)),
        _ => None,
    }
}

// Fractions truncate toward zero.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => Some(parse_leading_integer(text)),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => Some(parse_leading_double(text)),
        _ => None,
    }
}
