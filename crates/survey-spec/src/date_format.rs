//! Unicode date patterns (`yyyy-MM-dd'T'HH:mm:ss.SSSZZZZZ`) over chrono.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::ConfigError;

pub const ISO8601_TIMESTAMP: &str = "yyyy-MM-dd'T'HH:mm:ss.SSSZZZZZ";
pub const ISO8601_DATE_ONLY: &str = "yyyy-MM-dd";
pub const ISO8601_TIME_ONLY: &str = "HH:mm:ss.SSS";

const FILL_SEPARATOR: char = '\u{1}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Components {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    minute: bool,
    zone: bool,
}

/// Parses and formats dates with a fixed Unicode pattern. Components missing
/// from the pattern read as 2000-01-01 00:00, and zone-less patterns read and
/// write in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCoder {
    pattern: String,
    strftime: String,
    components: Components,
}

impl DateCoder {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let (strftime, components) = translate(pattern)?;
        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(unsupported(pattern, "no chrono equivalent"));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
            components,
        })
    }

    pub fn iso8601_timestamp() -> Self {
        Self {
            pattern: ISO8601_TIMESTAMP.to_string(),
            strftime: "%Y-%m-%dT%H:%M:%S.%3f%:z".to_string(),
            components: Components {
                year: true,
                month: true,
                day: true,
                hour: true,
                minute: true,
                zone: true,
            },
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, date: &DateTime<FixedOffset>) -> String {
        date.format(&self.strftime).to_string()
    }

    /// Returns `None` unless the whole text matches the pattern.
    pub fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let mut format = self.strftime.clone();
        let mut input = text.to_string();
        let fills = [
            (self.components.year, "%Y", "2000"),
            (self.components.month, "%m", "01"),
            (self.components.day, "%d", "01"),
            (self.components.hour, "%H", "00"),
            (self.components.minute, "%M", "00"),
        ];
        for (present, spec, value) in fills {
            if !present {
                format.push(FILL_SEPARATOR);
                format.push_str(spec);
                input.push(FILL_SEPARATOR);
                input.push_str(value);
            }
        }

        if self.components.zone {
            DateTime::parse_from_str(&input, &format).ok()
        } else {
            NaiveDateTime::parse_from_str(&input, &format)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        }
    }
}

fn unsupported(pattern: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::UnsupportedDateFormat {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn translate(pattern: &str) -> Result<(String, Components), ConfigError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut components = Components::default();
    let mut twelve_hour = false;
    let mut meridiem = false;
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        if ch == '\'' {
            index += 1;
            if chars.get(index) == Some(&'\'') {
                out.push('\'');
                index += 1;
                continue;
            }
            loop {
                match chars.get(index) {
                    None => return Err(unsupported(pattern, "unterminated quoted literal")),
                    Some('\'') if chars.get(index + 1) == Some(&'\'') => {
                        out.push('\'');
                        index += 2;
                    }
                    Some('\'') => {
                        index += 1;
                        break;
                    }
                    Some(literal) => {
                        push_literal(&mut out, *literal);
                        index += 1;
                    }
                }
            }
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            index += 1;
            continue;
        }

        let run = chars[index..].iter().take_while(|next| **next == ch).count();
        index += run;
        let spec = match (ch, run) {
            ('y', 2) => {
                components.year = true;
                "%y"
            }
            ('y' | 'u', _) => {
                components.year = true;
                "%Y"
            }
            ('M' | 'L', 1) => {
                components.month = true;
                "%-m"
            }
            ('M' | 'L', 2) => {
                components.month = true;
                "%m"
            }
            ('M' | 'L', 3) => {
                components.month = true;
                "%b"
            }
            ('M' | 'L', _) => {
                components.month = true;
                "%B"
            }
            ('d', 1) => {
                components.day = true;
                "%-d"
            }
            ('d', 2) => {
                components.day = true;
                "%d"
            }
            ('H', 1) => {
                components.hour = true;
                "%-H"
            }
            ('H', 2) => {
                components.hour = true;
                "%H"
            }
            ('h', 1) => {
                components.hour = true;
                twelve_hour = true;
                "%-I"
            }
            ('h', 2) => {
                components.hour = true;
                twelve_hour = true;
                "%I"
            }
            ('m', 1) => {
                components.minute = true;
                "%-M"
            }
            ('m', 2) => {
                components.minute = true;
                "%M"
            }
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', _) => {
                meridiem = true;
                "%p"
            }
            ('E', 1..=3) => "%a",
            ('E', 4) => "%A",
            ('Z', 1..=3) | ('X' | 'x', 1 | 2) => {
                components.zone = true;
                "%z"
            }
            ('Z', 5) | ('X' | 'x', 3) => {
                components.zone = true;
                "%:z"
            }
            _ => {
                return Err(unsupported(
                    pattern,
                    format!("unsupported field '{}'", ch.to_string().repeat(run)),
                ));
            }
        };
        out.push_str(spec);
    }

    if twelve_hour && !meridiem {
        return Err(unsupported(pattern, "12-hour field 'h' needs an 'a' am/pm marker"));
    }
    Ok((out, components))
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}
