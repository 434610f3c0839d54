use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{InputItem, InputItemContext, InputItemFields, InputItemType, KeyboardOptions};
use crate::answer_type::AnswerType;
use crate::ui_hint::UiHint;
use crate::validator::{
    DoubleFormatOptions, IntegerFormatOptions, PassThruValidator, RegExValidator,
    StringValidator, TextValidator, YearFormatOptions,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecimalTextInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_options: Option<DoubleFormatOptions>,
}

impl DecimalTextInputItem {
    pub(super) fn build(&self) -> InputItem {
        let options = self.format_options.clone().unwrap_or_default();
        let validator = options.number_validator();
        let picker = self
            .format_options
            .as_ref()
            .map(|_| validator.picker_source());
        self.fields
            .resolve(InputItemType::Decimal, UiHint::Textfield, AnswerType::Number)
            .with_keyboard_options(KeyboardOptions::decimal_entry())
            .with_picker(picker)
            .with_validator(TextValidator::Number(validator))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegerTextInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_options: Option<IntegerFormatOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_options: Option<KeyboardOptions>,
}

impl IntegerTextInputItem {
    pub(super) fn build(&self) -> InputItem {
        let options = self.format_options.clone().unwrap_or_default();
        let validator = options.number_validator();
        let picker = self
            .format_options
            .as_ref()
            .map(|_| validator.picker_source());
        self.fields
            .resolve(InputItemType::Integer, UiHint::Textfield, AnswerType::Integer)
            .with_keyboard_options(
                self.keyboard_options
                    .clone()
                    .unwrap_or_else(KeyboardOptions::integer_entry),
            )
            .with_picker(picker)
            .with_validator(TextValidator::Number(validator))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearTextInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_options: Option<YearFormatOptions>,
}

impl YearTextInputItem {
    pub(super) fn build(&self, context: &InputItemContext) -> InputItem {
        let options = self.format_options.clone().unwrap_or_default();
        let validator = options.number_validator_for(context.now.year());
        let picker = (validator.minimum_value.is_some() && validator.maximum_value.is_some())
            .then(|| validator.picker_source());
        self.fields
            .resolve(InputItemType::Year, UiHint::Textfield, AnswerType::Integer)
            .with_keyboard_options(KeyboardOptions::integer_entry())
            .with_picker(picker)
            .with_validator(TextValidator::Number(validator))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StringTextInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_options: Option<KeyboardOptions>,
    #[serde(rename = "regExValidator", default, skip_serializing_if = "Option::is_none")]
    pub reg_ex_validator: Option<RegExValidator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl StringTextInputItem {
    pub(super) fn build_text_validator(&self) -> TextValidator {
        match (&self.reg_ex_validator, self.max_length) {
            (None, None) => TextValidator::PassThru(PassThruValidator),
            (Some(reg_ex), None) => TextValidator::RegEx(reg_ex.clone()),
            (reg_ex, Some(max_length)) => TextValidator::String(StringValidator {
                max_length: Some(max_length),
                reg_ex: reg_ex.clone(),
            }),
        }
    }

    pub(super) fn build(&self) -> InputItem {
        self.fields
            .resolve(InputItemType::String, UiHint::Textfield, AnswerType::String)
            .with_keyboard_options(self.keyboard_options.clone().unwrap_or_default())
            .with_validator(self.build_text_validator())
    }
}
