//! Length and mass units used by height and weight questions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Mass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementUnit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

impl MeasurementUnit {
    /// Accepts symbols and singular or plural names, case-insensitively.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let unit = match symbol.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Self::Millimeter,
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Self::Centimeter,
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meter,
            "in" | "inch" | "inches" | "\"" | "″" => Self::Inch,
            "ft" | "foot" | "feet" | "'" | "′" => Self::Foot,
            "g" | "gram" | "grams" => Self::Gram,
            "kg" | "kilogram" | "kilograms" => Self::Kilogram,
            "oz" | "ounce" | "ounces" => Self::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            _ => return None,
        };
        Some(unit)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Ounce => "oz",
            Self::Pound => "lb",
        }
    }

    pub fn plural_name(&self) -> &'static str {
        match self {
            Self::Millimeter => "millimeters",
            Self::Centimeter => "centimeters",
            Self::Meter => "meters",
            Self::Inch => "inches",
            Self::Foot => "feet",
            Self::Gram => "grams",
            Self::Kilogram => "kilograms",
            Self::Ounce => "ounces",
            Self::Pound => "pounds",
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Millimeter | Self::Centimeter | Self::Meter | Self::Inch | Self::Foot => {
                Dimension::Length
            }
            Self::Gram | Self::Kilogram | Self::Ounce | Self::Pound => Dimension::Mass,
        }
    }

    // meters for length, kilograms for mass
    fn base_factor(&self) -> f64 {
        match self {
            Self::Millimeter => 0.001,
            Self::Centimeter => 0.01,
            Self::Meter => 1.0,
            Self::Inch => 0.0254,
            Self::Foot => 0.3048,
            Self::Gram => 0.001,
            Self::Kilogram => 1.0,
            Self::Ounce => 0.028_349_523_125,
            Self::Pound => 0.453_592_37,
        }
    }

    /// Converts between units of the same dimension, rounded to six decimals.
    pub fn convert(value: f64, from: MeasurementUnit, to: MeasurementUnit) -> Option<f64> {
        if from.dimension() != to.dimension() {
            return None;
        }
        if from == to {
            return Some(value);
        }
        let converted = value * from.base_factor() / to.base_factor();
        Some((converted * 1e6).round() / 1e6)
    }
}

/// Age bracket a height or weight question is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HumanMeasurementRange {
    #[default]
    Adult,
    Child,
    Infant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

impl MeasurementSystem {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "metric" => Some(Self::Metric),
            "imperial" | "us" => Some(Self::Imperial),
            _ => None,
        }
    }

    pub fn uses_metric(&self) -> bool {
        *self == Self::Metric
    }
}
