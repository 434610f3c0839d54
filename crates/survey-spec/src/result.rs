use chrono::{DateTime, FixedOffset, Local};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::answer_type::AnswerType;
use crate::answer_value::AnswerValue;
use crate::error::{ShapeError, SpecError};

pub const ANSWER_RESULT_TYPE: &str = "answer";

/// The recorded answer to one question or input item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AnswerResultWire")]
pub struct AnswerResult {
    pub identifier: String,
    pub answer_type: Option<AnswerType>,
    /// Canonical JSON value, already passed through the answer type.
    pub value: Option<Value>,
    pub question_text: Option<String>,
    pub question_data: Option<Value>,
    pub skip_to_identifier: Option<String>,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResultWire {
    #[serde(rename = "type", default = "answer_result_type")]
    result_type: String,
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer_type: Option<AnswerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skip_to_identifier: Option<String>,
    start_date: DateTime<FixedOffset>,
    end_date: DateTime<FixedOffset>,
}

fn answer_result_type() -> String {
    ANSWER_RESULT_TYPE.to_string()
}

impl TryFrom<AnswerResultWire> for AnswerResult {
    type Error = SpecError;

    fn try_from(wire: AnswerResultWire) -> Result<Self, Self::Error> {
        let value = match (&wire.answer_type, wire.value) {
            (Some(answer_type), Some(raw)) => Some(answer_type.decode_value(&raw)?),
            (Some(_), None) => None,
            (None, raw) => raw,
        };
        Ok(AnswerResult {
            identifier: wire.identifier,
            answer_type: wire.answer_type,
            value: value.filter(|value| !value.is_null()),
            question_text: wire.question_text,
            question_data: wire.question_data,
            skip_to_identifier: wire.skip_to_identifier,
            start_date: wire.start_date,
            end_date: wire.end_date,
        })
    }
}

impl Serialize for AnswerResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match (&self.answer_type, &self.value) {
            (Some(answer_type), Some(value)) => Some(
                answer_type
                    .encode_answer(Some(&AnswerValue::Json(value.clone())))
                    .map_err(S::Error::custom)?,
            ),
            (_, value) => value.clone(),
        };
        AnswerResultWire {
            result_type: answer_result_type(),
            identifier: self.identifier.clone(),
            answer_type: self.answer_type.clone(),
            value,
            question_text: self.question_text.clone(),
            question_data: self.question_data.clone(),
            skip_to_identifier: self.skip_to_identifier.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
        .serialize(serializer)
    }
}

impl AnswerResult {
    pub fn new(identifier: impl Into<String>, answer_type: Option<AnswerType>) -> Self {
        let now = Local::now().fixed_offset();
        Self {
            identifier: identifier.into(),
            answer_type,
            value: None,
            question_text: None,
            question_data: None,
            skip_to_identifier: None,
            start_date: now,
            end_date: now,
        }
    }

    /// A result for a value stored without a declared answer type.
    pub fn with_inferred_type(identifier: impl Into<String>, value: Value) -> Self {
        let mut result = Self::new(identifier, Some(AnswerType::infer(&value)));
        result.value = Some(value).filter(|value| !value.is_null());
        result
    }

    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let wire: AnswerResultWire = serde_json::from_value(value)?;
        AnswerResult::try_from(wire)
    }

    pub fn result_type(&self) -> &'static str {
        ANSWER_RESULT_TYPE
    }

    /// Records a native answer through the answer type. Without a declared
    /// type the answer's own JSON is stored.
    pub fn set_answer(&mut self, answer: Option<&AnswerValue>) -> Result<(), ShapeError> {
        let encoded = match &self.answer_type {
            Some(answer_type) => {
                let encoded = answer_type.encode_answer(answer)?;
                if encoded.is_null() {
                    encoded
                } else {
                    answer_type.decode_value(&encoded)?
                }
            }
            None => answer.map(AnswerValue::to_json).unwrap_or(Value::Null),
        };
        self.value = Some(encoded).filter(|value| !value.is_null());
        self.end_date = Local::now().fixed_offset();
        Ok(())
    }

    /// The stored value in its native form.
    pub fn answer(&self) -> Result<Option<AnswerValue>, ShapeError> {
        match &self.answer_type {
            Some(answer_type) => answer_type.decode_answer(self.value.as_ref()),
            None => Ok(self.value.clone().map(AnswerValue::Json)),
        }
    }

    /// Answer type to compare with: declared, else inferred from the value.
    pub fn effective_answer_type(&self) -> AnswerType {
        match (&self.answer_type, &self.value) {
            (Some(answer_type), _) => answer_type.clone(),
            (None, Some(value)) => AnswerType::infer(value),
            (None, None) => AnswerType::String,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        let value = serde_cbor::value::to_value(self)?;
        serde_cbor::to_vec(&value)
    }
}
