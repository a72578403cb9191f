//! Common regex patterns for bill extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Header/footer noise: 12/03/2024, 1-2-24
    pub static ref DATE_PATTERN: Regex = Regex::new(
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b"
    ).unwrap();

    // Time of day: 9:45, 21:05
    pub static ref TIME_PATTERN: Regex = Regex::new(
        r"\b\d{1,2}:\d{2}\b"
    ).unwrap();

    // Printed amounts next to a totals keyword: 300, -12.5, 1,234.50, 12,00,000
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"[-+]?[0-9]+(?:,[0-9]{2,3})*(?:\.[0-9]{1,2})?"
    ).unwrap();
}

/// Check whether a line reads as a date or a time of day.
pub fn is_date_or_time(line: &str) -> bool {
    DATE_PATTERN.is_match(line) || TIME_PATTERN.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_and_times() {
        assert!(is_date_or_time("Date: 12/03/2024"));
        assert!(is_date_or_time("1-2-24 Table 4"));
        assert!(is_date_or_time("Time 9:45 PM"));
        assert!(!is_date_or_time("Paneer Tikka 2 150 300"));
        assert!(!is_date_or_time("Ratio 1/2"));
    }

    #[test]
    fn test_total_amount_keeps_thousands_groups() {
        let found: Vec<&str> = TOTAL_AMOUNT
            .find_iter("Grand Total : 1,234.50")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1,234.50"]);
    }

    #[test]
    fn test_total_amount_keeps_lakh_groups() {
        let found: Vec<&str> = TOTAL_AMOUNT
            .find_iter("Net Payable 12,00,000 / 1,23,456.00")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["12,00,000", "1,23,456.00"]);
    }

    #[test]
    fn test_total_amount_signs() {
        let found: Vec<&str> = TOTAL_AMOUNT
            .find_iter("Balance -12.5 after +3")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["-12.5", "+3"]);
    }
}
