use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{InputItem, InputItemContext, InputItemFields, InputItemType, KeyboardOptions};
use crate::answer_type::AnswerType;
use crate::error::ConfigError;
use crate::ui_hint::UiHint;
use crate::validator::{DatePickerMode, DateRange, DateTimeValidator, PassThruValidator, TextValidator};

/// Shared by the `date-time`, `date` and `time` item types; the type selects
/// the picker mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_options: Option<DateRange>,
}

impl DateTimeInputItem {
    fn range(&self) -> DateRange {
        self.format_options.clone().unwrap_or_default()
    }

    pub fn answer_type(&self, mode: DatePickerMode) -> AnswerType {
        AnswerType::date_time(Some(self.range().coding_format(mode)))
    }

    pub(super) fn validate(&self, mode: DatePickerMode) -> Result<(), ConfigError> {
        self.range().validate(mode)
    }

    pub(super) fn build(
        &self,
        input_item_type: InputItemType,
        mode: DatePickerMode,
        context: &InputItemContext,
    ) -> InputItem {
        let item = self
            .fields
            .resolve(input_item_type, UiHint::Picker, self.answer_type(mode))
            .with_keyboard_options(KeyboardOptions::date_time_entry());
        match DateTimeValidator::new(mode, &self.range(), context.now) {
            Ok(validator) => item
                .with_picker(Some(validator.picker_source()))
                .with_validator(TextValidator::DateTime(validator)),
            Err(err) => {
                tracing::warn!(error = %err, "date item has an unusable coding format");
                item.with_validator(TextValidator::PassThru(PassThruValidator))
            }
        }
    }
}
