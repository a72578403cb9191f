//! Duplicate line item removal.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::trace;

use super::rules::round_key;
use crate::models::bill::LineItem;
use crate::models::config::ExtractionConfig;

/// Keeps the first item for every (name, rounded amount) pair.
///
/// The amount is the most reliably recognized field, so the name and the
/// amount identify a line even when rate or quantity vary between scans.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    precision: u32,
}

impl Deduplicator {
    /// Create a deduplicator rounding amounts to `precision` decimals.
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Create a deduplicator from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.dedup_precision)
    }

    /// Identity of an item.
    pub fn key(&self, item: &LineItem) -> (String, Decimal) {
        (
            item.name.trim().to_lowercase(),
            round_key(item.amount, self.precision),
        )
    }

    /// Drop every item whose key was already seen, keeping order.
    pub fn dedup(&self, items: impl IntoIterator<Item = LineItem>) -> Vec<LineItem> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for item in items {
            if seen.insert(self.key(&item)) {
                unique.push(item);
            } else {
                trace!("Dropping duplicate item {:?} ({})", item.name, item.amount);
            }
        }

        unique
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(name: &str, cents: i64) -> LineItem {
        LineItem::new(name, Decimal::new(cents, 2))
    }

    #[test]
    fn test_first_occurrence_wins() {
        let items = vec![
            item("Paneer Tikka", 30000).with_rate(Decimal::new(150, 0)),
            item("Naan", 4000),
            item("paneer tikka ", 30000),
        ];

        let unique = Deduplicator::default().dedup(items);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].rate, Some(Decimal::new(150, 0)));
        assert_eq!(unique[1].name, "Naan");
    }

    #[test]
    fn test_amount_rounding() {
        let items = vec![
            LineItem::new("Tea", Decimal::new(200001, 4)),
            LineItem::new("Tea", Decimal::new(20, 0)),
            LineItem::new("Tea", Decimal::new(2001, 2)),
        ];

        let unique = Deduplicator::new(2).dedup(items);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].amount, Decimal::new(2001, 2));
    }

    #[test]
    fn test_same_name_other_amount_kept() {
        let unique = Deduplicator::default().dedup(vec![item("Coke", 4000), item("Coke", 8000)]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let dedup = Deduplicator::default();
        let once = dedup.dedup(vec![item("A1", 100), item("a1", 100), item("B2", 100)]);
        let twice = dedup.dedup(once.clone());
        assert_eq!(once, twice);
    }
}
