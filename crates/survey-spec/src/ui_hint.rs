use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Preferred control for presenting an input item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum UiHint {
    Button,
    Checkbox,
    Checkmark,
    Combobox,
    DisclosureArrow,
    Link,
    List,
    MultipleLine,
    Picker,
    Popover,
    RadioButton,
    Section,
    Slider,
    Textfield,
    Toggle,
}

impl UiHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiHint::Button => "button",
            UiHint::Checkbox => "checkbox",
            UiHint::Checkmark => "checkmark",
            UiHint::Combobox => "combobox",
            UiHint::DisclosureArrow => "disclosureArrow",
            UiHint::Link => "link",
            UiHint::List => "list",
            UiHint::MultipleLine => "multipleLine",
            UiHint::Picker => "picker",
            UiHint::Popover => "popover",
            UiHint::RadioButton => "radioButton",
            UiHint::Section => "section",
            UiHint::Slider => "slider",
            UiHint::Textfield => "textfield",
            UiHint::Toggle => "toggle",
        }
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self, UiHint::Textfield | UiHint::MultipleLine | UiHint::Popover)
    }
}

impl fmt::Display for UiHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
