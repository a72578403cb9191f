//! Bill data models and the response payload handed to the API layer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single purchased line on the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description as printed.
    #[serde(rename = "item_name")]
    pub name: String,

    /// Line amount.
    #[serde(rename = "item_amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Unit rate.
    #[serde(rename = "item_rate", with = "rust_decimal::serde::float_option", default)]
    pub rate: Option<Decimal>,

    /// Quantity.
    #[serde(
        rename = "item_quantity",
        with = "rust_decimal::serde::float_option",
        default
    )]
    pub quantity: Option<Decimal>,
}

impl LineItem {
    /// Create an item with only a name and an amount.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
            rate: None,
            quantity: None,
        }
    }

    /// Set the unit rate.
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Kind of page; bills only have one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    #[default]
    #[serde(rename = "Bill Detail")]
    BillDetail,
}

/// Items found on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number, serialized as a string.
    #[serde(with = "page_number")]
    pub page_no: u32,

    /// Page kind.
    #[serde(default)]
    pub page_type: PageType,

    /// Page-level deduplicated items in row order.
    #[serde(rename = "bill_items")]
    pub items: Vec<LineItem>,
}

impl PageResult {
    /// Create a bill detail page.
    pub fn new(page_no: u32, items: Vec<LineItem>) -> Self {
        Self {
            page_no,
            page_type: PageType::BillDetail,
            items,
        }
    }
}

/// Totals printed on the document, keyed by the keyword that anchored them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsMap {
    entries: BTreeMap<String, Decimal>,
}

impl TotalsMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `keyword` unless the keyword already has one.
    /// Returns whether the value was recorded.
    pub fn record(&mut self, keyword: &str, value: Decimal) -> bool {
        if self.entries.contains_key(keyword) {
            return false;
        }
        self.entries.insert(keyword.to_string(), value);
        true
    }

    /// Value recorded for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<Decimal> {
        self.entries.get(keyword).copied()
    }

    /// Whether `keyword` already has a value.
    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    /// Number of keywords with a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keyword has a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by keyword.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Serialize for TotalsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(k, v)| (k, v.to_f64().unwrap_or(f64::NAN))),
        )
    }
}

impl<'de> Deserialize<'de> for TotalsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for (keyword, value) in raw {
            let value = Decimal::from_f64(value).ok_or_else(|| {
                serde::de::Error::custom(format!("total for {:?} is out of range", keyword))
            })?;
            entries.insert(keyword, value);
        }
        Ok(Self { entries })
    }
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Per-page items.
    pub pages: Vec<PageResult>,

    /// Document-wide deduplicated items.
    pub items: Vec<LineItem>,

    /// Sum of the deduplicated amounts, rounded to cents.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_total: Decimal,

    /// Totals found next to keywords in the document text.
    pub totals: TotalsMap,
}

impl ExtractionResult {
    /// Number of document-wide unique items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Data section of the API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillData {
    pub pagewise_line_items: Vec<PageResult>,
    pub total_item_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_total_extracted: Decimal,
    pub totals_detected_in_text: TotalsMap,
}

impl From<&ExtractionResult> for BillData {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            pagewise_line_items: result.pages.clone(),
            total_item_count: result.item_count(),
            final_total_extracted: result.final_total,
            totals_detected_in_text: result.totals.clone(),
        }
    }
}

/// Token accounting; extraction is rule-based so it is always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub total_tokens: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Response envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillResponse {
    pub is_success: bool,
    pub token_usage: TokenUsage,
    pub data: BillData,
}

impl BillResponse {
    /// Wrap a successful extraction.
    pub fn success(result: &ExtractionResult) -> Self {
        Self {
            is_success: true,
            token_usage: TokenUsage::default(),
            data: BillData::from(result),
        }
    }
}

mod page_number {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(page_no: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(page_no)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_line_item_wire_format() {
        let item = LineItem::new("Paneer Tikka", Decimal::new(300, 0))
            .with_rate(Decimal::new(150, 0))
            .with_quantity(Decimal::new(2, 0));

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "item_name": "Paneer Tikka",
                "item_amount": 300.0,
                "item_rate": 150.0,
                "item_quantity": 2.0
            })
        );
    }

    #[test]
    fn test_absent_fields_are_null() {
        let item = LineItem::new("Tea", Decimal::new(2050, 2));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["item_amount"], json!(20.5));
        assert_eq!(value["item_rate"], serde_json::Value::Null);
        assert_eq!(value["item_quantity"], serde_json::Value::Null);
    }

    #[test]
    fn test_page_result_wire_format() {
        let page = PageResult::new(3, Vec::new());
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({"page_no": "3", "page_type": "Bill Detail", "bill_items": []})
        );

        let back: PageResult = serde_json::from_value(json!({"page_no": 3, "bill_items": []})).unwrap();
        assert_eq!(back, page);
    }

    #[test]
    fn test_totals_first_value_wins() {
        let mut totals = TotalsMap::new();
        assert!(totals.record("total", Decimal::new(10, 0)));
        assert!(!totals.record("total", Decimal::new(99, 0)));

        assert_eq!(totals.get("total"), Some(Decimal::new(10, 0)));
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn test_response_envelope() {
        let mut totals = TotalsMap::new();
        totals.record("grand total", Decimal::new(123450, 2));

        let result = ExtractionResult {
            pages: vec![PageResult::new(1, vec![LineItem::new("Tea", Decimal::new(20, 0))])],
            items: vec![LineItem::new("Tea", Decimal::new(20, 0))],
            final_total: Decimal::new(20, 0),
            totals,
        };

        let value = serde_json::to_value(BillResponse::success(&result)).unwrap();

        assert_eq!(value["is_success"], json!(true));
        assert_eq!(value["token_usage"]["total_tokens"], json!(0));
        assert_eq!(value["data"]["total_item_count"], json!(1));
        assert_eq!(value["data"]["final_total_extracted"], json!(20.0));
        assert_eq!(
            value["data"]["totals_detected_in_text"],
            json!({"grand total": 1234.5})
        );
        assert_eq!(value["data"]["pagewise_line_items"][0]["page_no"], json!("1"));
    }
}
