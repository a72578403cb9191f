//! Numeric token classification shared by the row rules and totals search.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Thousands separator stripped before parsing.
const THOUSANDS_SEPARATOR: char = ',';

/// Outcome of classifying a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericToken {
    /// The token is a number with this value.
    Number(Decimal),
    /// The token is not a number.
    Text,
}

impl NumericToken {
    /// Value of a numeric token.
    pub fn value(self) -> Option<Decimal> {
        match self {
            NumericToken::Number(v) => Some(v),
            NumericToken::Text => None,
        }
    }

    pub fn is_number(self) -> bool {
        matches!(self, NumericToken::Number(_))
    }
}

/// Classify a token as numeric or text.
pub fn classify_token(text: &str) -> NumericToken {
    match parse_number(text) {
        Some(v) => NumericToken::Number(v),
        None => NumericToken::Text,
    }
}

/// Parse a number written with optional comma thousands separators
/// (e.g., "1,234.50", "-3", "300").
pub fn parse_number(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .collect();

    // Decimal's parser is lenient about separators of its own; only plain
    // signed decimals count as numbers here.
    let negative = cleaned.starts_with('-');
    let body = cleaned.strip_prefix(['+', '-']).unwrap_or(&cleaned);
    let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
    let well_formed = (!integer.is_empty() || !fraction.is_empty())
        && integer.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());

    if !well_formed {
        return None;
    }

    let mut canonical = String::with_capacity(body.len() + 2);
    if negative {
        canonical.push('-');
    }
    canonical.push_str(if integer.is_empty() { "0" } else { integer });
    if !fraction.is_empty() {
        canonical.push('.');
        canonical.push_str(fraction);
    }

    Decimal::from_str(&canonical).ok()
}

/// Round to `precision` decimal places and drop trailing zeros, so equal
/// values compare and hash equal.
pub fn round_key(value: Decimal, precision: u32) -> Decimal {
    value.round_dp(precision).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("300"), Some(dec("300")));
        assert_eq!(parse_number("1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_number("-12.5"), Some(dec("-12.5")));
        assert_eq!(parse_number("+7"), Some(dec("7")));
        assert_eq!(parse_number(".5"), Some(dec("0.5")));
        assert_eq!(parse_number("12,00,000"), Some(dec("1200000")));
    }

    #[test]
    fn test_parse_rejects_text() {
        assert_eq!(parse_number("Tikka"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number(","), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("12kg"), None);
        assert_eq!(parse_number("1_000"), None);
        assert_eq!(parse_number("Rs.300"), None);
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token("150"), NumericToken::Number(dec("150")));
        assert_eq!(classify_token("Tea"), NumericToken::Text);
        assert!(!classify_token("x1").is_number());
    }

    #[test]
    fn test_round_key() {
        assert_eq!(round_key(dec("300.004"), 2), round_key(dec("300"), 2));
        assert_eq!(round_key(dec("1.50"), 2).to_string(), "1.5");
    }
}
