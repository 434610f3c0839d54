use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::choice::JsonChoice;
use crate::number_format::NumberFormat;
use crate::validator::DatePickerMode;

/// Data a picker control needs to offer its values.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerSource {
    Number {
        minimum: Decimal,
        maximum: Decimal,
        step_interval: Option<Decimal>,
        format: NumberFormat,
    },
    Choice {
        choices: Vec<JsonChoice>,
    },
    Date {
        mode: DatePickerMode,
        minimum_date: Option<DateTime<FixedOffset>>,
        maximum_date: Option<DateTime<FixedOffset>>,
        minute_interval: Option<u32>,
        default_date: Option<DateTime<FixedOffset>>,
    },
    /// Feet and inches wheels for adult heights.
    ImperialHeight { feet: Vec<u32>, inches: Vec<u32> },
    /// Pounds and ounces wheels for infant weights.
    InfantMass { pounds: Vec<u32>, ounces: Vec<u32> },
}

impl PickerSource {
    pub fn imperial_height() -> Self {
        PickerSource::ImperialHeight {
            feet: (1..=8).collect(),
            inches: (0..=11).collect(),
        }
    }

    pub fn infant_mass() -> Self {
        PickerSource::InfantMass {
            pounds: (0..=30).collect(),
            ounces: (0..=15).collect(),
        }
    }
}
