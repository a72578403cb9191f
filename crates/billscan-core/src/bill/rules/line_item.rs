//! Line item assignment: give the numbers of a candidate row their roles.
//!
//! Reading right to left, the last number is the amount, the one before it
//! the rate and the one before that the quantity. Everything left of the
//! first number is the item name.

use rust_decimal::Decimal;

use super::row_filter::CandidateRow;
use crate::error::Rejection;
use crate::models::bill::LineItem;
use crate::models::config::ExtractionConfig;

/// Characters stripped from item names.
const QUOTES: [char; 3] = ['"', '\u{201c}', '\u{201d}'];

/// Assigns amount, rate and quantity and validates the result.
#[derive(Debug, Clone)]
pub struct LineItemAssigner {
    amount_ceiling: Decimal,
    quantity_ceiling: Decimal,
    rate_ceiling: Decimal,
    consistency_tolerance: Decimal,
    min_name_length: usize,
    stoplist: Vec<String>,
}

impl LineItemAssigner {
    /// Create an assigner from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            amount_ceiling: config.amount_ceiling,
            quantity_ceiling: config.quantity_ceiling,
            rate_ceiling: config.rate_ceiling,
            consistency_tolerance: config.consistency_tolerance,
            min_name_length: config.min_name_length,
            stoplist: config
                .name_stoplist
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
        }
    }

    /// Turn a candidate row into a line item, or say why it is not one.
    pub fn assign(&self, row: &CandidateRow<'_>) -> Result<LineItem, Rejection> {
        let numbers = row.numbers();

        let amount = match numbers.last() {
            Some(&amount) => amount,
            None => {
                return Err(Rejection::TooFewNumbers {
                    found: 0,
                    required: 1,
                });
            }
        };
        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveAmount(amount.to_string()));
        }
        if amount > self.amount_ceiling {
            return Err(Rejection::AmountAboveCeiling {
                amount: amount.to_string(),
                ceiling: self.amount_ceiling.to_string(),
            });
        }

        let from_end = |n: usize| numbers.len().checked_sub(n).map(|i| numbers[i]);

        // Zero reads as "not printed" and values past the ceilings are
        // misrecognitions; both leave the field absent.
        let rate = from_end(2).filter(|r| !r.is_zero() && *r <= self.rate_ceiling);
        let quantity = from_end(3).filter(|q| !q.is_zero() && *q <= self.quantity_ceiling);

        if let (Some(quantity), Some(rate)) = (quantity, rate) {
            if !self.is_consistent(quantity, rate, amount) {
                return Err(Rejection::Inconsistent {
                    quantity: quantity.to_string(),
                    rate: rate.to_string(),
                    amount: amount.to_string(),
                });
            }
        }

        let name = self.name(row)?;

        Ok(LineItem {
            name,
            amount,
            rate,
            quantity,
        })
    }

    /// `|quantity * rate - amount| <= tolerance * amount`. A product that does
    /// not fit in a `Decimal` is never consistent with an amount that does.
    fn is_consistent(&self, quantity: Decimal, rate: Decimal, amount: Decimal) -> bool {
        let deviation = match quantity
            .checked_mul(rate)
            .and_then(|product| product.checked_sub(amount))
        {
            Some(difference) => difference.abs(),
            None => return false,
        };

        match self.consistency_tolerance.checked_mul(amount) {
            Some(allowed) => deviation <= allowed,
            None => true,
        }
    }

    fn name(&self, row: &CandidateRow<'_>) -> Result<String, Rejection> {
        let end = row.first_number_index().unwrap_or(0);
        let joined = row.texts()[..end].join(" ");
        let name: String = joined.chars().filter(|c| !QUOTES.contains(c)).collect();
        let name = name.trim();

        if name.chars().count() < self.min_name_length {
            return Err(Rejection::NameTooShort(name.to_string()));
        }
        if self.stoplist.contains(&name.to_lowercase()) {
            return Err(Rejection::StoplistedName(name.to_string()));
        }
        if name.chars().all(|c| c.is_ascii_digit()) {
            return Err(Rejection::NumericName(name.to_string()));
        }

        Ok(name.to_string())
    }
}

impl Default for LineItemAssigner {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::rules::RowClassifier;
    use pretty_assertions::assert_eq;

    fn assign(texts: &[&str]) -> Result<LineItem, Rejection> {
        let row = RowClassifier::new(1).classify_texts(texts.to_vec())?;
        LineItemAssigner::default().assign(&row)
    }

    fn d(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_full_item() {
        let item = assign(&["Paneer", "Tikka", "2", "150", "300"]).unwrap();

        assert_eq!(
            item,
            LineItem::new("Paneer Tikka", d(300))
                .with_rate(d(150))
                .with_quantity(d(2))
        );
    }

    #[test]
    fn test_rate_and_amount_only() {
        let item = assign(&["Masala", "Dosa", "80", "80"]).unwrap();

        assert_eq!(item, LineItem::new("Masala Dosa", d(80)).with_rate(d(80)));
    }

    #[test]
    fn test_amount_above_ceiling() {
        let err = assign(&["Delivery", "Fee", "100000", "300000"]).unwrap_err();
        assert!(matches!(err, Rejection::AmountAboveCeiling { .. }));
    }

    #[test]
    fn test_non_positive_amount() {
        let err = assign(&["Discount", "10", "-50"]).unwrap_err();
        assert!(matches!(err, Rejection::NonPositiveAmount(_)));

        let err = assign(&["Nothing", "10", "0"]).unwrap_err();
        assert!(matches!(err, Rejection::NonPositiveAmount(_)));
    }

    #[test]
    fn test_inconsistent_row_rejected_whole() {
        let err = assign(&["Naan", "3", "40", "200"]).unwrap_err();
        assert!(matches!(err, Rejection::Inconsistent { .. }));
    }

    #[test]
    fn test_consistency_tolerance_boundary() {
        // 2 x 100 = 200 vs 250: deviation 50 = 20% of 250, accepted.
        assert!(assign(&["Lassi", "2", "100", "250"]).is_ok());
        // 2 x 100 = 200 vs 251: deviation 51 > 50.2, rejected.
        assert!(assign(&["Lassi", "2", "100", "251"]).is_err());
    }

    #[test]
    fn test_large_quantity_dropped() {
        // 500 is a misread quantity; with it gone the consistency check
        // no longer applies.
        let item = assign(&["Rice", "500", "60", "60"]).unwrap();

        assert_eq!(item.quantity, None);
        assert_eq!(item.rate, Some(d(60)));
    }

    #[test]
    fn test_overflowing_product_rejected() {
        let config = ExtractionConfig {
            amount_ceiling: Decimal::MAX,
            quantity_ceiling: Decimal::MAX,
            rate_ceiling: Decimal::MAX,
            ..ExtractionConfig::default()
        };
        let huge = "100000000000000000000";
        let row = RowClassifier::new(1)
            .classify_texts(vec!["Big", "Item", huge, huge, "5"])
            .unwrap();

        let result = LineItemAssigner::from_config(&config).assign(&row);

        assert!(matches!(result, Err(Rejection::Inconsistent { .. })));
    }

    #[test]
    fn test_large_rate_dropped() {
        let item = assign(&["Tea", "2", "150000", "40"]).unwrap();

        assert_eq!(item.rate, None);
        assert_eq!(item.quantity, Some(d(2)));
    }

    #[test]
    fn test_zero_quantity_absent() {
        let item = assign(&["Water", "0", "20", "20"]).unwrap();

        assert_eq!(item.quantity, None);
        assert_eq!(item.rate, Some(d(20)));
    }

    #[test]
    fn test_name_cleanup() {
        let item = assign(&["\u{201c}Cold", "Coffee\"", "1", "90", "90"]).unwrap();
        assert_eq!(item.name, "Cold Coffee");
    }

    #[test]
    fn test_name_stops_at_first_number() {
        let item = assign(&["Thali", "2", "Special", "1", "250", "250"]).unwrap();

        assert_eq!(item.name, "Thali");
        assert_eq!(item.quantity, Some(d(1)));
    }

    #[test]
    fn test_name_rejections() {
        assert!(matches!(assign(&["X", "2", "10", "20"]), Err(Rejection::NameTooShort(_))));
        assert!(matches!(assign(&["10", "20"]), Err(Rejection::NameTooShort(_))));
        assert!(matches!(assign(&["INR", "10", "20"]), Err(Rejection::StoplistedName(_))));
        assert!(matches!(assign(&["Dr", "10", "20"]), Err(Rejection::StoplistedName(_))));
        assert!(matches!(assign(&["\"42\"", "10", "20"]), Err(Rejection::NumericName(_))));
    }

    #[test]
    fn test_decimal_amounts() {
        let item = assign(&["Chai", "2", "12.50", "25.00"]).unwrap();

        assert_eq!(item.amount, Decimal::new(2500, 2));
        assert_eq!(item.rate, Some(Decimal::new(1250, 2)));
    }
}
