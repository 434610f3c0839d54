//! Declarative input item definitions and the concrete items built from them.

mod choice;
mod date;
mod keyboard;
mod measurement;
mod text;

use std::env;
use std::fmt;

use chrono::{DateTime, FixedOffset, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use choice::{
    CheckboxInputItem, ChoicePickerInputItem, SkipCheckboxInputItem, StringChoicePickerInputItem,
};
pub use date::DateTimeInputItem;
pub use keyboard::{AutocapitalizationType, KeyboardOptions, KeyboardType, TextCheckingType};
pub use measurement::MeasurementInputItem;
pub use text::{
    DecimalTextInputItem, IntegerTextInputItem, StringTextInputItem, YearTextInputItem,
};

use crate::answer_type::AnswerType;
use crate::choice::JsonChoice;
use crate::error::{ConfigError, SpecError};
use crate::picker::PickerSource;
use crate::ui_hint::UiHint;
use crate::units::MeasurementSystem;
use crate::validator::{DatePickerMode, TextValidator};

pub const MEASUREMENT_SYSTEM_ENV: &str = "SURVEY_MEASUREMENT_SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum InputItemType {
    #[serde(rename = "decimal")]
    Decimal,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "stringChoicePicker")]
    StringChoicePicker,
    #[serde(rename = "choicePicker")]
    ChoicePicker,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "skipCheckbox")]
    SkipCheckbox,
    #[serde(rename = "height")]
    Height,
    #[serde(rename = "weight")]
    Weight,
}

impl InputItemType {
    /// Discriminators accepted for `InputItemBuilder`.
    pub const BUILDERS: [InputItemType; 12] = [
        InputItemType::Decimal,
        InputItemType::Integer,
        InputItemType::String,
        InputItemType::Year,
        InputItemType::DateTime,
        InputItemType::Date,
        InputItemType::Time,
        InputItemType::StringChoicePicker,
        InputItemType::ChoicePicker,
        InputItemType::Checkbox,
        InputItemType::Height,
        InputItemType::Weight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputItemType::Decimal => "decimal",
            InputItemType::Integer => "integer",
            InputItemType::String => "string",
            InputItemType::Year => "year",
            InputItemType::DateTime => "date-time",
            InputItemType::Date => "date",
            InputItemType::Time => "time",
            InputItemType::StringChoicePicker => "stringChoicePicker",
            InputItemType::ChoicePicker => "choicePicker",
            InputItemType::Checkbox => "checkbox",
            InputItemType::SkipCheckbox => "skipCheckbox",
            InputItemType::Height => "height",
            InputItemType::Weight => "weight",
        }
    }
}

impl fmt::Display for InputItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant context used when building items: unit system and the instant
/// relative date and year bounds are measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputItemContext {
    pub measurement_system: MeasurementSystem,
    pub now: DateTime<FixedOffset>,
}

impl InputItemContext {
    pub fn new(measurement_system: MeasurementSystem, now: DateTime<FixedOffset>) -> Self {
        Self {
            measurement_system,
            now,
        }
    }

    pub fn current(measurement_system: MeasurementSystem) -> Self {
        Self::new(measurement_system, Local::now().fixed_offset())
    }

    /// Reads the unit system from `SURVEY_MEASUREMENT_SYSTEM`, defaulting to
    /// metric.
    pub fn from_env() -> Self {
        let system = match env::var(MEASUREMENT_SYSTEM_ENV) {
            Ok(value) => MeasurementSystem::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "unknown measurement system, using metric");
                MeasurementSystem::Metric
            }),
            Err(_) => MeasurementSystem::Metric,
        };
        Self::current(system)
    }
}

impl Default for InputItemContext {
    fn default() -> Self {
        Self::current(MeasurementSystem::Metric)
    }
}

/// Attributes shared by most input item definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputItemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_hint: Option<UiHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "optional", default, skip_serializing_if = "Option::is_none")]
    pub is_optional: Option<bool>,
    #[serde(rename = "exclusive", default, skip_serializing_if = "Option::is_none")]
    pub is_exclusive: Option<bool>,
}

impl InputItemFields {
    /// Resolves the shared attributes. Items are optional and not exclusive
    /// unless stated.
    pub(crate) fn resolve(
        &self,
        input_item_type: InputItemType,
        default_ui_hint: UiHint,
        answer_type: AnswerType,
    ) -> InputItem {
        InputItem {
            input_item_type: Some(input_item_type),
            identifier: self.identifier.clone(),
            field_label: self.field_label.clone(),
            placeholder: self.placeholder.clone(),
            detail: None,
            ui_hint: self.ui_hint.unwrap_or(default_ui_hint),
            is_optional: self.is_optional.unwrap_or(true),
            is_exclusive: self.is_exclusive.unwrap_or(false),
            answer_type,
            keyboard_options: KeyboardOptions::default(),
            kind: InputItemKind::Entry,
            validator: TextValidator::default(),
            picker: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputItemKind {
    /// Text field or picker backed by the item's validator.
    Entry,
    /// One option of a choice question.
    Choice(JsonChoice),
    Checkbox,
    SkipCheckbox { matching_value: Option<Value> },
}

/// A concrete input item with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InputItem {
    pub input_item_type: Option<InputItemType>,
    pub identifier: Option<String>,
    pub field_label: Option<String>,
    pub placeholder: Option<String>,
    pub detail: Option<String>,
    pub ui_hint: UiHint,
    pub is_optional: bool,
    pub is_exclusive: bool,
    pub answer_type: AnswerType,
    pub keyboard_options: KeyboardOptions,
    pub kind: InputItemKind,
    validator: TextValidator,
    picker: Option<PickerSource>,
}

impl InputItem {
    pub fn build_text_validator(&self) -> TextValidator {
        self.validator.clone()
    }

    pub fn build_picker_source(&self) -> Option<PickerSource> {
        self.picker.clone()
    }

    /// Result identifier for this item; items without one answer for their
    /// question.
    pub fn result_identifier<'a>(&'a self, question_identifier: &'a str) -> &'a str {
        self.identifier.as_deref().unwrap_or(question_identifier)
    }

    /// JSON recorded when a selectable item is selected or cleared. Entry
    /// items record what the validator returns instead.
    pub fn json_element(&self, selected: bool) -> Option<Value> {
        match &self.kind {
            InputItemKind::Entry => None,
            InputItemKind::Checkbox => Some(Value::Bool(selected)),
            InputItemKind::Choice(choice) => selected
                .then(|| choice.matching_value.clone().unwrap_or(Value::Null)),
            InputItemKind::SkipCheckbox { matching_value } => {
                selected.then(|| matching_value.clone().unwrap_or(Value::Null))
            }
        }
    }

    pub(crate) fn with_validator(mut self, validator: TextValidator) -> Self {
        self.validator = validator;
        self
    }

    pub(crate) fn with_picker(mut self, picker: Option<PickerSource>) -> Self {
        self.picker = picker;
        self
    }

    pub(crate) fn with_keyboard_options(mut self, keyboard_options: KeyboardOptions) -> Self {
        self.keyboard_options = keyboard_options;
        self
    }

    pub(crate) fn with_kind(mut self, kind: InputItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn choice_option(choice: &JsonChoice, answer_type: AnswerType, ui_hint: UiHint) -> Self {
        InputItem {
            input_item_type: None,
            identifier: None,
            field_label: choice.display_text(),
            placeholder: None,
            detail: choice.detail.clone(),
            ui_hint,
            is_optional: true,
            is_exclusive: choice.is_exclusive,
            answer_type,
            keyboard_options: KeyboardOptions::default(),
            kind: InputItemKind::Choice(choice.clone()),
            validator: TextValidator::default(),
            picker: None,
        }
    }
}

/// Declarative input item, decoded from `{"type": ..}` JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", try_from = "InputItemBuilderRepr")]
pub enum InputItemBuilder {
    #[serde(rename = "decimal")]
    Decimal(DecimalTextInputItem),
    #[serde(rename = "integer")]
    Integer(IntegerTextInputItem),
    #[serde(rename = "string")]
    String(StringTextInputItem),
    #[serde(rename = "year")]
    Year(YearTextInputItem),
    #[serde(rename = "date-time")]
    DateTime(DateTimeInputItem),
    #[serde(rename = "date")]
    Date(DateTimeInputItem),
    #[serde(rename = "time")]
    Time(DateTimeInputItem),
    #[serde(rename = "stringChoicePicker")]
    StringChoicePicker(StringChoicePickerInputItem),
    #[serde(rename = "choicePicker")]
    ChoicePicker(ChoicePickerInputItem),
    #[serde(rename = "checkbox")]
    Checkbox(CheckboxInputItem),
    #[serde(rename = "height")]
    Height(MeasurementInputItem),
    #[serde(rename = "weight")]
    Weight(MeasurementInputItem),
}

#[derive(Deserialize, JsonSchema)]
#[serde(tag = "type")]
enum InputItemBuilderRepr {
    #[serde(rename = "decimal")]
    Decimal(DecimalTextInputItem),
    #[serde(rename = "integer")]
    Integer(IntegerTextInputItem),
    #[serde(rename = "string")]
    String(StringTextInputItem),
    #[serde(rename = "year")]
    Year(YearTextInputItem),
    #[serde(rename = "date-time")]
    DateTime(DateTimeInputItem),
    #[serde(rename = "date")]
    Date(DateTimeInputItem),
    #[serde(rename = "time")]
    Time(DateTimeInputItem),
    #[serde(rename = "stringChoicePicker")]
    StringChoicePicker(StringChoicePickerInputItem),
    #[serde(rename = "choicePicker")]
    ChoicePicker(ChoicePickerInputItem),
    #[serde(rename = "checkbox")]
    Checkbox(CheckboxInputItem),
    #[serde(rename = "height")]
    Height(MeasurementInputItem),
    #[serde(rename = "weight")]
    Weight(MeasurementInputItem),
}

impl TryFrom<InputItemBuilderRepr> for InputItemBuilder {
    type Error = ConfigError;

    fn try_from(repr: InputItemBuilderRepr) -> Result<Self, Self::Error> {
        let item = match repr {
            InputItemBuilderRepr::Decimal(item) => InputItemBuilder::Decimal(item),
            InputItemBuilderRepr::Integer(item) => InputItemBuilder::Integer(item),
            InputItemBuilderRepr::String(item) => InputItemBuilder::String(item),
            InputItemBuilderRepr::Year(item) => InputItemBuilder::Year(item),
            InputItemBuilderRepr::DateTime(item) => InputItemBuilder::DateTime(item),
            InputItemBuilderRepr::Date(item) => InputItemBuilder::Date(item),
            InputItemBuilderRepr::Time(item) => InputItemBuilder::Time(item),
            InputItemBuilderRepr::StringChoicePicker(item) => {
                InputItemBuilder::StringChoicePicker(item)
            }
            InputItemBuilderRepr::ChoicePicker(item) => InputItemBuilder::ChoicePicker(item),
            InputItemBuilderRepr::Checkbox(item) => InputItemBuilder::Checkbox(item),
            InputItemBuilderRepr::Height(item) => InputItemBuilder::Height(item),
            InputItemBuilderRepr::Weight(item) => InputItemBuilder::Weight(item),
        };
        item.validate().inspect_err(|err| {
            tracing::warn!(
                item_type = item.input_item_type().as_str(),
                error = %err,
                "rejecting input item definition"
            );
        })?;
        Ok(item)
    }
}

impl Default for InputItemBuilder {
    fn default() -> Self {
        InputItemBuilder::String(StringTextInputItem::default())
    }
}

impl InputItemBuilder {
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let repr: InputItemBuilderRepr = serde_json::from_value(value)?;
        Ok(InputItemBuilder::try_from(repr)?)
    }

    pub fn input_item_type(&self) -> InputItemType {
        match self {
            InputItemBuilder::Decimal(_) => InputItemType::Decimal,
            InputItemBuilder::Integer(_) => InputItemType::Integer,
            InputItemBuilder::String(_) => InputItemType::String,
            InputItemBuilder::Year(_) => InputItemType::Year,
            InputItemBuilder::DateTime(_) => InputItemType::DateTime,
            InputItemBuilder::Date(_) => InputItemType::Date,
            InputItemBuilder::Time(_) => InputItemType::Time,
            InputItemBuilder::StringChoicePicker(_) => InputItemType::StringChoicePicker,
            InputItemBuilder::ChoicePicker(_) => InputItemType::ChoicePicker,
            InputItemBuilder::Checkbox(_) => InputItemType::Checkbox,
            InputItemBuilder::Height(_) => InputItemType::Height,
            InputItemBuilder::Weight(_) => InputItemType::Weight,
        }
    }

    pub fn fields(&self) -> Option<&InputItemFields> {
        match self {
            InputItemBuilder::Decimal(item) => Some(&item.fields),
            InputItemBuilder::Integer(item) => Some(&item.fields),
            InputItemBuilder::String(item) => Some(&item.fields),
            InputItemBuilder::Year(item) => Some(&item.fields),
            InputItemBuilder::DateTime(item)
            | InputItemBuilder::Date(item)
            | InputItemBuilder::Time(item) => Some(&item.fields),
            InputItemBuilder::StringChoicePicker(item) => Some(&item.fields),
            InputItemBuilder::ChoicePicker(item) => Some(&item.fields),
            InputItemBuilder::Checkbox(_) => None,
            InputItemBuilder::Height(item) | InputItemBuilder::Weight(item) => Some(&item.fields),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            InputItemBuilder::Checkbox(item) => item.identifier.as_deref(),
            other => other
                .fields()
                .and_then(|fields| fields.identifier.as_deref()),
        }
    }

    fn date_mode(&self) -> Option<DatePickerMode> {
        match self {
            InputItemBuilder::DateTime(_) => Some(DatePickerMode::DateAndTime),
            InputItemBuilder::Date(_) => Some(DatePickerMode::Date),
            InputItemBuilder::Time(_) => Some(DatePickerMode::Time),
            _ => None,
        }
    }

    pub fn answer_type(&self) -> AnswerType {
        match self {
            InputItemBuilder::Decimal(_) => AnswerType::Number,
            InputItemBuilder::Integer(_) | InputItemBuilder::Year(_) => AnswerType::Integer,
            InputItemBuilder::String(_) | InputItemBuilder::StringChoicePicker(_) => {
                AnswerType::String
            }
            InputItemBuilder::DateTime(item)
            | InputItemBuilder::Date(item)
            | InputItemBuilder::Time(item) => match self.date_mode() {
                Some(mode) => item.answer_type(mode),
                None => AnswerType::date_time(None),
            },
            InputItemBuilder::ChoicePicker(item) => item.answer_type(),
            InputItemBuilder::Checkbox(_) => AnswerType::Boolean,
            InputItemBuilder::Height(_) => AnswerType::measurement(Some("cm")),
            InputItemBuilder::Weight(_) => AnswerType::measurement(Some("kg")),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            InputItemBuilder::DateTime(item)
            | InputItemBuilder::Date(item)
            | InputItemBuilder::Time(item) => match self.date_mode() {
                Some(mode) => item.validate(mode),
                None => Ok(()),
            },
            InputItemBuilder::ChoicePicker(item) => item.validate(),
            _ => Ok(()),
        }
    }

    pub fn build_input_item(&self, context: &InputItemContext) -> InputItem {
        match self {
            InputItemBuilder::Decimal(item) => item.build(),
            InputItemBuilder::Integer(item) => item.build(),
            InputItemBuilder::String(item) => item.build(),
            InputItemBuilder::Year(item) => item.build(context),
            InputItemBuilder::DateTime(item) => {
                item.build(InputItemType::DateTime, DatePickerMode::DateAndTime, context)
            }
            InputItemBuilder::Date(item) => {
                item.build(InputItemType::Date, DatePickerMode::Date, context)
            }
            InputItemBuilder::Time(item) => {
                item.build(InputItemType::Time, DatePickerMode::Time, context)
            }
            InputItemBuilder::StringChoicePicker(item) => item.build(),
            InputItemBuilder::ChoicePicker(item) => item.build(),
            InputItemBuilder::Checkbox(item) => item.build(),
            InputItemBuilder::Height(item) => item.build_height(context),
            InputItemBuilder::Weight(item) => item.build_weight(context),
        }
    }
}
