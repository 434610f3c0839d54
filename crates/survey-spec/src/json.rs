use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of a JSON value as seen by answer types and choice lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(number) if number.is_i64() || number.is_u64() => JsonType::Integer,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }

    /// Whether a value of shape `other` may appear where `self` is declared.
    /// Integers are accepted wherever numbers are.
    pub fn accepts(&self, other: JsonType) -> bool {
        *self == other || (*self == JsonType::Number && other == JsonType::Integer)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            JsonType::Boolean | JsonType::Integer | JsonType::Number | JsonType::String
        )
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text form of a JSON value; strings are returned without quotes.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// Reads a flag from free text. Leading whitespace, a sign and leading zeros
/// are skipped; the text is true when the next character is one of `YyTt` or a
/// non-zero digit. Anything else is false.
pub fn parse_truthy(text: &str) -> bool {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let rest = unsigned.trim_start_matches('0');
    matches!(
        rest.chars().next(),
        Some('Y' | 'y' | 'T' | 't' | '1'..='9')
    )
}

/// Reads a whole string as a flag: `true`/`false`, `yes`/`no` in any case,
/// or an integer (non-zero is true). `None` when the text is anything else.
pub fn parse_flag(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => trimmed.parse::<i64>().ok().map(|number| number != 0),
    }
}

/// Parses the leading integer of `text`, ignoring whatever follows it.
/// Returns zero when no digits are found and saturates on overflow.
pub fn parse_leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }
    if negative { -value } else { value }
}

/// Parses the leading floating point literal of `text`, ignoring whatever
/// follows it. Returns zero when no number is found.
pub fn parse_leading_double(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_run = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = digits_run(end);
    end += integer_digits;
    let mut mantissa_digits = integer_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = digits_run(end + 1);
        mantissa_digits += fraction_digits;
        end += 1 + fraction_digits;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exponent_digits = digits_run(cursor);
        if exponent_digits > 0 {
            end = cursor + exponent_digits;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_distinguishes_integers() {
        assert_eq!(JsonType::of(&json!(3)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(3.5)), JsonType::Number);
        assert!(JsonType::Number.accepts(JsonType::Integer));
        assert!(!JsonType::Integer.accepts(JsonType::Number));
    }

    #[test]
    fn truthy_text_follows_leading_character() {
        assert!(parse_truthy("YES"));
        assert!(parse_truthy("true"));
        assert!(parse_truthy("  007"));
        assert!(parse_truthy("-1"));
        assert!(!parse_truthy("no"));
        assert!(!parse_truthy("0"));
        assert!(!parse_truthy(""));
        assert!(!parse_truthy("maybe"));
    }

    #[test]
    fn flags_must_read_completely() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" false "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag("1x"), None);
    }

    #[test]
    fn leading_integer_ignores_trailing_text() {
        assert_eq!(parse_leading_integer("42"), 42);
        assert_eq!(parse_leading_integer("  -17abc"), -17);
        assert_eq!(parse_leading_integer("3.9"), 3);
        assert_eq!(parse_leading_integer("abc"), 0);
        assert_eq!(parse_leading_integer("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn leading_double_reads_float_literals() {
        assert_eq!(parse_leading_double("3.14"), 3.14);
        assert_eq!(parse_leading_double("-.5kg"), -0.5);
        assert_eq!(parse_leading_double("1.5e3 units"), 1500.0);
        assert_eq!(parse_leading_double("2e"), 2.0);
        assert_eq!(parse_leading_double("."), 0.0);
        assert_eq!(parse_leading_double("abc"), 0.0);
    }
}
