use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{InputItem, InputItemContext, InputItemFields, InputItemType, KeyboardOptions};
use crate::picker::PickerSource;
use crate::ui_hint::UiHint;
use crate::units::{HumanMeasurementRange, MeasurementSystem};
use crate::validator::{MeasurementValidator, TextValidator};

/// Height or weight entry. Answers are stored in centimeters or kilograms
/// whatever unit the participant types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementInputItem {
    #[serde(flatten)]
    pub fields: InputItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_range: Option<HumanMeasurementRange>,
}

impl MeasurementInputItem {
    pub fn measurement_range(&self) -> HumanMeasurementRange {
        self.measurement_range.unwrap_or_default()
    }

    pub(super) fn build_height(&self, context: &InputItemContext) -> InputItem {
        let range = self.measurement_range();
        let validator = MeasurementValidator::height(range, context.measurement_system);
        let picker = (range == HumanMeasurementRange::Adult
            && context.measurement_system == MeasurementSystem::Imperial)
            .then(PickerSource::imperial_height);
        self.finish(InputItemType::Height, validator, picker)
    }

    pub(super) fn build_weight(&self, context: &InputItemContext) -> InputItem {
        let range = self.measurement_range();
        let validator = MeasurementValidator::weight(range, context.measurement_system);
        let picker = (range == HumanMeasurementRange::Infant
            && context.measurement_system == MeasurementSystem::Imperial)
            .then(PickerSource::infant_mass);
        self.finish(InputItemType::Weight, validator, picker)
    }

    fn finish(
        &self,
        input_item_type: InputItemType,
        validator: MeasurementValidator,
        picker: Option<PickerSource>,
    ) -> InputItem {
        let mut item = self.fields.resolve(
            input_item_type,
            UiHint::Textfield,
            validator.answer_type.clone(),
        );
        item.ui_hint = if picker.is_some() {
            UiHint::Picker
        } else {
            UiHint::Textfield
        };
        if item.placeholder.is_none() {
            item.placeholder = Some(validator.entry_unit().plural_name().to_string());
        }
        item.with_keyboard_options(KeyboardOptions::measurement_entry())
            .with_picker(picker)
            .with_validator(TextValidator::Measurement(validator))
    }
}
