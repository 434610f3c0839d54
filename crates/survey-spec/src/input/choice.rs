use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{InputItem, InputItemFields, InputItemKind, InputItemType, KeyboardOptions};
use crate::answer_type::AnswerType;
use crate::choice::{JsonChoice, infer_base_type, validate_choices};
use crate::error::ConfigError;
use crate::json::JsonType;
use crate::picker::PickerSource;
use crate::ui_hint::UiHint;
use crate::validator::{PassThruValidator, TextValidator};

/// Picker over typed choices. The answer type follows the JSON type of the
/// choice values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoicePickerInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default)]
    pub choices: Vec<JsonChoice>,
}

impl ChoicePickerInputItem {
    pub fn base_type(&self) -> JsonType {
        infer_base_type(&self.choices)
    }

    pub fn answer_type(&self) -> AnswerType {
        AnswerType::from_json_type(self.base_type())
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        validate_choices(&self.choices, self.base_type())
    }

    pub(super) fn build(&self) -> InputItem {
        self.fields
            .resolve(InputItemType::ChoicePicker, UiHint::Picker, self.answer_type())
            .with_keyboard_options(KeyboardOptions::default())
            .with_picker(Some(PickerSource::Choice {
                choices: self.choices.clone(),
            }))
            .with_validator(TextValidator::PassThru(PassThruValidator))
    }
}

/// Picker over plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StringChoicePickerInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl StringChoicePickerInputItem {
    pub fn json_choices(&self) -> Vec<JsonChoice> {
        self.choices.iter().map(JsonChoice::from_text).collect()
    }

    pub(super) fn build(&self) -> InputItem {
        self.fields
            .resolve(InputItemType::StringChoicePicker, UiHint::Picker, AnswerType::String)
            .with_picker(Some(PickerSource::Choice {
                choices: self.json_choices(),
            }))
    }
}

/// A single labelled checkbox answering true or false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxInputItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub field_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckboxInputItem {
    pub(super) fn build(&self) -> InputItem {
        let fields = InputItemFields {
            identifier: self.identifier.clone(),
            field_label: Some(self.field_label.clone()),
            ..InputItemFields::default()
        };
        let mut item = fields
            .resolve(InputItemType::Checkbox, UiHint::Checkbox, AnswerType::Boolean)
            .with_kind(InputItemKind::Checkbox);
        item.detail = self.detail.clone();
        item
    }
}

fn skip_checkbox_type() -> String {
    InputItemType::SkipCheckbox.as_str().to_string()
}

/// "Prefer not to answer" style checkbox attached to a question. Selecting
/// it records `value`, or null when no value is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkipCheckboxInputItem {
    #[serde(rename = "type", default = "skip_checkbox_type")]
    item_type: String,
    pub field_label: String,
    #[serde(rename = "value", default, skip_serializing_if = "Option::is_none")]
    pub matching_value: Option<Value>,
}

impl SkipCheckboxInputItem {
    pub fn new(field_label: impl Into<String>, matching_value: Option<Value>) -> Self {
        Self {
            item_type: skip_checkbox_type(),
            field_label: field_label.into(),
            matching_value,
        }
    }

    /// Whether a recorded answer is the one this checkbox produces.
    pub fn matches_answer(&self, answer: Option<&Value>) -> bool {
        let expected = self.matching_value.as_ref().unwrap_or(&Value::Null);
        answer.unwrap_or(&Value::Null) == expected
    }

    pub fn build_input_item(&self) -> InputItem {
        let fields = InputItemFields {
            field_label: Some(self.field_label.clone()),
            is_exclusive: Some(true),
            ..InputItemFields::default()
        };
        fields
            .resolve(InputItemType::SkipCheckbox, UiHint::Checkbox, AnswerType::Null)
            .with_kind(InputItemKind::SkipCheckbox {
                matching_value: self.matching_value.clone(),
            })
    }
}
