use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormatStyle {
    #[default]
    None,
    Decimal,
    Currency,
    Percent,
    Scientific,
    SpellOut,
    Ordinal,
}

/// Formats and parses numbers shown in numeric text fields and pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub style: NumberFormatStyle,
    pub uses_grouping_separator: bool,
    pub maximum_fraction_digits: u32,
}

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

impl NumberFormat {
    pub fn new(
        style: NumberFormatStyle,
        uses_grouping_separator: bool,
        maximum_fraction_digits: u32,
    ) -> Self {
        Self {
            style,
            uses_grouping_separator,
            maximum_fraction_digits,
        }
    }

    pub fn format(&self, value: Decimal) -> String {
        match self.style {
            NumberFormatStyle::None => self.rounded(value).to_string(),
            NumberFormatStyle::Decimal => self.grouped(&self.rounded(value).to_string()),
            NumberFormatStyle::Currency => {
                let rounded = value.round_dp_with_strategy(
                    self.maximum_fraction_digits,
                    RoundingStrategy::MidpointNearestEven,
                );
                let digits = format!(
                    "{:.*}",
                    self.maximum_fraction_digits as usize,
                    rounded.abs()
                );
                let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
                    "-"
                } else {
                    ""
                };
                format!("{sign}${}", self.grouped(&digits))
            }
            NumberFormatStyle::Percent => {
                let scaled = self.rounded(value * Decimal::ONE_HUNDRED);
                format!("{}%", self.grouped(&scaled.to_string()))
            }
            NumberFormatStyle::Scientific => match value.to_f64() {
                Some(float) => format!("{float:E}"),
                None => value.to_string(),
            },
            NumberFormatStyle::SpellOut => self.spell_out(value),
            NumberFormatStyle::Ordinal => {
                let whole = value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
                let suffix = whole
                    .abs()
                    .to_u64()
                    .map(ordinal_suffix)
                    .unwrap_or("th");
                format!("{}{suffix}", self.grouped(&whole.normalize().to_string()))
            }
        }
    }

    /// Parses text written in this format. Style decorations are optional.
    pub fn parse(&self, text: &str) -> Option<Decimal> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match self.style {
            NumberFormatStyle::SpellOut => {
                parse_spelled(trimmed).or_else(|| self.parse_plain(trimmed))
            }
            NumberFormatStyle::Percent => {
                let body = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
                self.parse_plain(body)
                    .map(|value| value / Decimal::ONE_HUNDRED)
            }
            NumberFormatStyle::Currency => {
                let (negative, unsigned) = match trimmed.strip_prefix('-') {
                    Some(rest) => (true, rest.trim_start()),
                    None => (false, trimmed),
                };
                let body = unsigned.strip_prefix('$').unwrap_or(unsigned);
                let value = self.parse_plain(body)?;
                Some(if negative { -value } else { value })
            }
            NumberFormatStyle::Ordinal => {
                let body = ["st", "nd", "rd", "th"]
                    .iter()
                    .find_map(|suffix| trimmed.strip_suffix(suffix))
                    .unwrap_or(trimmed);
                self.parse_plain(body)
            }
            NumberFormatStyle::None | NumberFormatStyle::Decimal | NumberFormatStyle::Scientific => {
                self.parse_plain(trimmed)
            }
        }
    }

    fn rounded(&self, value: Decimal) -> Decimal {
        value
            .round_dp_with_strategy(
                self.maximum_fraction_digits,
                RoundingStrategy::MidpointNearestEven,
            )
            .normalize()
    }

    fn grouped(&self, text: &str) -> String {
        if !self.uses_grouping_separator {
            return text.to_string();
        }
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (unsigned, None),
        };
        let mut grouped = String::with_capacity(text.len() + whole.len() / 3);
        for (index, ch) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        match fraction {
            Some(fraction) => format!("{sign}{grouped}.{fraction}"),
            None => format!("{sign}{grouped}"),
        }
    }

    fn parse_plain(&self, text: &str) -> Option<Decimal> {
        let cleaned = if self.uses_grouping_separator {
            text.replace(',', "")
        } else {
            text.to_string()
        };
        if cleaned.contains(['e', 'E']) {
            Decimal::from_scientific(&cleaned).ok()
        } else {
            Decimal::from_str(&cleaned).ok()
        }
    }

    fn spell_out(&self, value: Decimal) -> String {
        let rounded = self.rounded(value);
        let Some(whole) = rounded.abs().trunc().to_u64() else {
            return rounded.to_string();
        };
        let mut words = spell_integer(whole);
        let text = rounded.abs().to_string();
        if let Some((_, fraction)) = text.split_once('.') {
            words.push_str(" point");
            for digit in fraction.bytes() {
                words.push(' ');
                words.push_str(ONES[usize::from(digit - b'0')]);
            }
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("minus {words}")
        } else {
            words
        }
    }
}

fn ordinal_suffix(value: u64) -> &'static str {
    match (value % 10, value % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn spell_integer(mut value: u64) -> String {
    if value == 0 {
        return ONES[0].to_string();
    }
    let mut words = Vec::new();
    for (scale, name) in SCALES {
        if value >= scale {
            words.push(format!("{} {name}", spell_below_thousand(value / scale)));
            value %= scale;
        }
    }
    if value > 0 {
        words.push(spell_below_thousand(value));
    }
    words.join(" ")
}

fn spell_below_thousand(value: u64) -> String {
    let mut parts = Vec::new();
    if value >= 100 {
        parts.push(format!("{} hundred", ONES[(value / 100) as usize]));
    }
    let rest = (value % 100) as usize;
    if rest >= 20 {
        let tens = TENS[rest / 10];
        parts.push(match rest % 10 {
            0 => tens.to_string(),
            ones => format!("{tens}-{}", ONES[ones]),
        });
    } else if rest > 0 {
        parts.push(ONES[rest].to_string());
    }
    parts.join(" ")
}

fn parse_spelled(text: &str) -> Option<Decimal> {
    let lower = text.to_ascii_lowercase();
    let tokens = lower
        .split(|ch: char| ch.is_whitespace() || ch == '-')
        .filter(|token| !token.is_empty() && *token != "and");

    let mut negative = false;
    let mut seen = false;
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut fraction: Option<String> = None;

    for token in tokens {
        if let Some(digits) = fraction.as_mut() {
            let digit = ONES[..10].iter().position(|word| *word == token)?;
            digits.push_str(&digit.to_string());
            continue;
        }
        match token {
            "minus" | "negative" if !seen => negative = true,
            "point" => fraction = Some(String::new()),
            "hundred" => current = current.checked_mul(100)?,
            word => {
                if let Some(small) = ONES.iter().position(|candidate| *candidate == word) {
                    current = current.checked_add(small as u64)?;
                } else if let Some(tens) = TENS
                    .iter()
                    .position(|candidate| !candidate.is_empty() && *candidate == word)
                {
                    current = current.checked_add(tens as u64 * 10)?;
                } else if let Some((scale, _)) = SCALES.iter().find(|(_, name)| *name == word) {
                    total = total.checked_add(current.checked_mul(*scale)?)?;
                    current = 0;
                } else {
                    return None;
                }
            }
        }
        seen = true;
    }

    if !seen {
        return None;
    }
    let mut literal = total.checked_add(current)?.to_string();
    if let Some(digits) = fraction {
        if digits.is_empty() {
            return None;
        }
        literal.push('.');
        literal.push_str(&digits);
    }
    let value = Decimal::from_str(&literal).ok()?;
    Some(if negative { -value } else { value })
}
