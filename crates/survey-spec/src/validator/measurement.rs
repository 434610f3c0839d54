use regex::Regex;

use super::TextInputValidator;
use crate::answer_type::AnswerType;
use crate::answer_value::{AnswerValue, Measurement};
use crate::error::{InputError, InputErrorKind};
use crate::units::{HumanMeasurementRange, MeasurementSystem, MeasurementUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    Height,
    Weight,
}

/// Reads heights and weights typed with units ("170 cm", "5' 7\"",
/// "7 lb 8 oz") and stores them in centimeters or kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementValidator {
    pub kind: MeasurementKind,
    pub measurement_range: HumanMeasurementRange,
    pub measurement_system: MeasurementSystem,
    pub answer_type: AnswerType,
}

impl MeasurementValidator {
    pub fn height(range: HumanMeasurementRange, system: MeasurementSystem) -> Self {
        Self::new(MeasurementKind::Height, range, system)
    }

    pub fn weight(range: HumanMeasurementRange, system: MeasurementSystem) -> Self {
        Self::new(MeasurementKind::Weight, range, system)
    }

    fn new(kind: MeasurementKind, range: HumanMeasurementRange, system: MeasurementSystem) -> Self {
        let mut validator = Self {
            kind,
            measurement_range: range,
            measurement_system: system,
            answer_type: AnswerType::Number,
        };
        validator.answer_type = AnswerType::measurement(Some(validator.canonical_unit().symbol()));
        validator
    }

    pub fn canonical_unit(&self) -> MeasurementUnit {
        match self.kind {
            MeasurementKind::Height => MeasurementUnit::Centimeter,
            MeasurementKind::Weight => MeasurementUnit::Kilogram,
        }
    }

    /// Unit assumed for a bare number.
    pub fn entry_unit(&self) -> MeasurementUnit {
        match (self.kind, self.measurement_system) {
            (MeasurementKind::Height, MeasurementSystem::Metric) => MeasurementUnit::Centimeter,
            (MeasurementKind::Height, MeasurementSystem::Imperial) => MeasurementUnit::Inch,
            (MeasurementKind::Weight, MeasurementSystem::Metric) => MeasurementUnit::Kilogram,
            (MeasurementKind::Weight, MeasurementSystem::Imperial) => MeasurementUnit::Pound,
        }
    }

    pub fn format(&self, measurement: &Measurement) -> Option<String> {
        let unit = MeasurementUnit::from_symbol(&measurement.unit)?;
        let to = |target| MeasurementUnit::convert(measurement.value, unit, target);
        let infant = self.measurement_range == HumanMeasurementRange::Infant;
        let text = match (self.kind, self.measurement_system) {
            (MeasurementKind::Height, MeasurementSystem::Metric) => {
                format!("{} cm", trimmed(to(MeasurementUnit::Centimeter)?, 1))
            }
            (MeasurementKind::Height, MeasurementSystem::Imperial) => {
                let inches = to(MeasurementUnit::Inch)?;
                if self.measurement_range == HumanMeasurementRange::Adult {
                    let total = inches.round() as i64;
                    format!("{}' {}\"", total / 12, total % 12)
                } else {
                    format!("{} in", trimmed(inches, 1))
                }
            }
            (MeasurementKind::Weight, MeasurementSystem::Metric) => {
                let digits = if infant { 2 } else { 1 };
                format!("{} kg", trimmed(to(MeasurementUnit::Kilogram)?, digits))
            }
            (MeasurementKind::Weight, MeasurementSystem::Imperial) if infant => {
                let ounces = to(MeasurementUnit::Ounce)?.round() as i64;
                format!("{} lb {} oz", ounces / 16, ounces % 16)
            }
            (MeasurementKind::Weight, MeasurementSystem::Imperial) => {
                format!("{} lb", trimmed(to(MeasurementUnit::Pound)?, 1))
            }
        };
        Some(text)
    }

    pub fn parse(&self, text: &str) -> Result<Measurement, InputError> {
        let canonical = self.canonical_unit();
        let parts = components(text)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| self.format_error(text))?;

        let mut total = 0.0;
        let mut previous: Option<MeasurementUnit> = None;
        for (value, symbol) in parts {
            let unit = match (symbol, previous) {
                (Some(symbol), _) => {
                    MeasurementUnit::from_symbol(&symbol).ok_or_else(|| self.format_error(text))?
                }
                (None, None) => self.entry_unit(),
                (None, Some(MeasurementUnit::Foot)) => MeasurementUnit::Inch,
                (None, Some(MeasurementUnit::Pound)) => MeasurementUnit::Ounce,
                (None, Some(_)) => return Err(self.format_error(text)),
            };
            let converted = MeasurementUnit::convert(value, unit, canonical).ok_or_else(|| {
                InputError::new(
                    InputErrorKind::InvalidType,
                    Some(text.to_string()),
                    format!("'{}' is not a unit of {}.", unit.symbol(), self.quantity_name()),
                )
            })?;
            total += converted;
            previous = Some(unit);
        }
        Ok(Measurement::new(
            (total * 1e6).round() / 1e6,
            canonical.symbol(),
        ))
    }

    fn quantity_name(&self) -> &'static str {
        match self.kind {
            MeasurementKind::Height => "length",
            MeasurementKind::Weight => "mass",
        }
    }

    fn format_error(&self, text: &str) -> InputError {
        InputError::new(
            InputErrorKind::InvalidFormat,
            Some(text.to_string()),
            format!("The {} entered is not valid.", self.quantity_name()),
        )
    }
}

fn trimmed(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

const COMPONENT_PATTERN: &str = r#"(\d+(?:\.\d*)?|\.\d+)\s*([\p{Alphabetic}'"′″]*)"#;

// Splits "5' 7\"" into [(5, Some("'")), (7, Some("\""))]. Only whitespace may
// separate the components.
fn components(text: &str) -> Option<Vec<(f64, Option<String>)>> {
    let regex = Regex::new(COMPONENT_PATTERN).ok()?;
    let mut parts = Vec::new();
    let mut end = 0;
    for captures in regex.captures_iter(text) {
        let whole = captures.get(0)?;
        if !text[end..whole.start()].trim().is_empty() {
            return None;
        }
        end = whole.end();
        let value: f64 = captures.get(1)?.as_str().parse().ok()?;
        let unit = captures
            .get(2)
            .map(|unit| unit.as_str())
            .filter(|unit| !unit.is_empty())
            .map(str::to_string);
        parts.push((value, unit));
    }
    text[end..].trim().is_empty().then_some(parts)
}

impl TextInputValidator for MeasurementValidator {
    fn answer_text(&self, answer: Option<&AnswerValue>) -> Option<String> {
        match answer? {
            AnswerValue::Measurement(measurement) => self.format(measurement),
            other => match self.answer_type.decode_answer(Some(&other.to_json())) {
                Ok(Some(AnswerValue::Measurement(measurement))) => self.format(&measurement),
                _ => None,
            },
        }
    }

    fn validate_text(&self, text: Option<&str>) -> Result<Option<AnswerValue>, InputError> {
        match text.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => self.parse(text).map(|measurement| Some(measurement.into())),
            None => Ok(None),
        }
    }

    fn validate_answer(
        &self,
        answer: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, InputError> {
        Ok(answer.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperial_adult_height_reads_feet_and_inches() {
        let validator =
            MeasurementValidator::height(HumanMeasurementRange::Adult, MeasurementSystem::Imperial);
        for text in ["5' 7\"", "5 ft 7 in", "5ft 7", "67"] {
            let measurement = validator.parse(text).expect(text);
            assert_eq!(measurement, Measurement::new(170.18, "cm"), "{text}");
        }
        let answer = AnswerValue::Measurement(Measurement::new(170.18, "cm"));
        assert_eq!(validator.answer_text(Some(&answer)).as_deref(), Some("5' 7\""));
    }

    #[test]
    fn infant_weight_in_pounds_and_ounces() {
        let validator =
            MeasurementValidator::weight(HumanMeasurementRange::Infant, MeasurementSystem::Imperial);
        let measurement = validator.parse("7 lb 8 oz").expect("parse");
        assert_eq!(measurement.unit, "kg");
        assert!((measurement.value - 3.401943).abs() < 1e-6);
        assert_eq!(validator.format(&measurement).as_deref(), Some("7 lb 8 oz"));
    }

    #[test]
    fn wrong_dimension_is_a_type_error() {
        let validator =
            MeasurementValidator::height(HumanMeasurementRange::Adult, MeasurementSystem::Metric);
        let err = validator.parse("70 kg").expect_err("mass for height");
        assert_eq!(err.kind, InputErrorKind::InvalidType);
        let err = validator.parse("tall").expect_err("no number");
        assert_eq!(err.kind, InputErrorKind::InvalidFormat);
    }

    #[test]
    fn components_are_separated_by_whitespace_only() {
        assert_eq!(
            components("5 ft 7in"),
            Some(vec![(5.0, Some("ft".into())), (7.0, Some("in".into()))])
        );
        assert_eq!(components("72.5"), Some(vec![(72.5, None)]));
        assert_eq!(components("5 ft, 7 in"), None);
        assert_eq!(components("about 70"), None);
    }

    #[test]
    fn metric_number_answers_format_in_centimeters() {
        let validator =
            MeasurementValidator::height(HumanMeasurementRange::Adult, MeasurementSystem::Metric);
        let answer = AnswerValue::Json(serde_json::json!(170.2));
        assert_eq!(validator.answer_text(Some(&answer)).as_deref(), Some("170.2 cm"));
    }
}
