use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::json::{self, JsonType};

/// One selectable option of a choice list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonChoice {
    #[serde(rename = "value", default, skip_serializing_if = "Option::is_none")]
    pub matching_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "exclusive", default, skip_serializing_if = "is_false")]
    pub is_exclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl JsonChoice {
    /// A string choice whose value is its text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            matching_value: Some(Value::String(text.clone())),
            text: Some(text),
            ..Self::default()
        }
    }

    pub fn with_value(value: Value, text: impl Into<String>) -> Self {
        Self {
            matching_value: Some(value),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Text shown for the choice, falling back to its value.
    pub fn display_text(&self) -> Option<String> {
        self.text
            .clone()
            .or_else(|| self.matching_value.as_ref().map(json::describe))
    }

    fn value_type(&self) -> Option<JsonType> {
        self.matching_value
            .as_ref()
            .filter(|value| !value.is_null())
            .map(JsonType::of)
    }
}

/// JSON type shared by the non-null choice values, defaulting to string.
/// Integer and number values mix into number.
pub fn infer_base_type(choices: &[JsonChoice]) -> JsonType {
    let mut base: Option<JsonType> = None;
    for found in choices.iter().filter_map(JsonChoice::value_type) {
        base = match base {
            None => Some(found),
            Some(JsonType::Integer) if found == JsonType::Number => Some(JsonType::Number),
            keep => keep,
        };
    }
    base.unwrap_or(JsonType::String)
}

/// Every non-null choice value must have the JSON type of the list.
pub fn validate_choices(choices: &[JsonChoice], base_type: JsonType) -> Result<(), ConfigError> {
    for (index, choice) in choices.iter().enumerate() {
        if let Some(found) = choice.value_type()
            && !base_type.accepts(found)
        {
            return Err(ConfigError::ChoiceTypeMismatch {
                index,
                expected: base_type,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_type_skips_null_values() {
        let choices = vec![
            JsonChoice {
                text: Some("none".into()),
                ..JsonChoice::default()
            },
            JsonChoice::with_value(json!(1), "one"),
            JsonChoice::with_value(json!(2.5), "two and a half"),
        ];
        assert_eq!(infer_base_type(&choices), JsonType::Number);
        assert!(validate_choices(&choices, JsonType::Number).is_ok());
    }

    #[test]
    fn mixed_types_are_rejected() {
        let choices = vec![
            JsonChoice::with_value(json!(1), "one"),
            JsonChoice::with_value(json!("two"), "two"),
        ];
        let base = infer_base_type(&choices);
        assert_eq!(base, JsonType::Integer);
        assert_eq!(
            validate_choices(&choices, base),
            Err(ConfigError::ChoiceTypeMismatch {
                index: 1,
                expected: JsonType::Integer,
                found: JsonType::String,
            })
        );
    }

    #[test]
    fn exclusive_flag_is_omitted_when_false() {
        let encoded = serde_json::to_value(JsonChoice::from_text("yes")).expect("encode");
        assert_eq!(encoded, json!({ "value": "yes", "text": "yes" }));
    }
}
