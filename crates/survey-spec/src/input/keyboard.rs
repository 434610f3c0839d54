use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AutocapitalizationType {
    None,
    Words,
    Sentences,
    AllCharacters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextCheckingType {
    Default,
    No,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum KeyboardType {
    Default,
    AsciiCapable,
    NumbersAndPunctuation,
    #[serde(rename = "URL")]
    Url,
    NumberPad,
    PhonePad,
    NamePhonePad,
    EmailAddress,
    DecimalPad,
    WebSearch,
}

/// Keyboard configuration for text entry. Unset values leave the platform
/// default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_secure_text_entry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocapitalization_type: Option<AutocapitalizationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocorrection_type: Option<TextCheckingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_checking_type: Option<TextCheckingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_type: Option<KeyboardType>,
}

impl KeyboardOptions {
    fn numeric(keyboard_type: KeyboardType) -> Self {
        Self {
            is_secure_text_entry: Some(false),
            autocapitalization_type: Some(AutocapitalizationType::None),
            autocorrection_type: Some(TextCheckingType::No),
            spell_checking_type: Some(TextCheckingType::No),
            keyboard_type: Some(keyboard_type),
        }
    }

    pub fn integer_entry() -> Self {
        Self::numeric(KeyboardType::NumberPad)
    }

    pub fn decimal_entry() -> Self {
        Self::numeric(KeyboardType::DecimalPad)
    }

    pub fn date_time_entry() -> Self {
        Self::numeric(KeyboardType::NumbersAndPunctuation)
    }

    pub fn measurement_entry() -> Self {
        Self::numeric(KeyboardType::NumbersAndPunctuation)
    }
}
