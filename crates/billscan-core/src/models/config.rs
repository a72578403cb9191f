//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillscanError, Result};

/// Main configuration for the billscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillscanConfig {
    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Keyword totals search configuration.
    pub totals: TotalsConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Line item extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum distance between a token's vertical center and a row's mean
    /// vertical center for the token to join that row.
    pub row_tolerance: f64,

    /// Minimum number of numeric tokens for a row to be an item candidate.
    pub min_numeric_tokens: usize,

    /// Amounts above this are misrecognitions and reject the row.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_ceiling: Decimal,

    /// Quantities above this are dropped.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity_ceiling: Decimal,

    /// Rates above this are dropped.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_ceiling: Decimal,

    /// Allowed relative deviation between `quantity * rate` and the amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub consistency_tolerance: Decimal,

    /// Decimal places the amount is rounded to for duplicate detection.
    pub dedup_precision: u32,

    /// Minimum item name length, in characters.
    pub min_name_length: usize,

    /// Names (lowercase) that are never items.
    pub name_stoplist: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 12.0,
            min_numeric_tokens: 2,
            amount_ceiling: Decimal::new(50_000, 0),
            quantity_ceiling: Decimal::new(100, 0),
            rate_ceiling: Decimal::new(100_000, 0),
            consistency_tolerance: Decimal::new(20, 2),
            dedup_precision: 2,
            min_name_length: 2,
            name_stoplist: ["inr", "pm", "am", "dr", "mr", "ms"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Keyword totals search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalsConfig {
    /// Phrases that anchor a document-declared total, matched case-insensitively.
    pub keywords: Vec<String>,

    /// Height of the coarse line buckets used for the search.
    pub bucket_size: f64,
}

impl Default for TotalsConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "total",
                "grand total",
                "amount payable",
                "net payable",
                "balance",
                "subtotal",
                "sub total",
                "sub-total",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            bucket_size: 10.0,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap JSON output in the `{is_success, token_usage, data}` envelope.
    pub envelope: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            envelope: true,
            pretty: false,
        }
    }
}

impl BillscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let e = &self.extraction;

        if !(e.row_tolerance.is_finite() && e.row_tolerance > 0.0) {
            return Err(invalid("extraction.row_tolerance must be positive"));
        }
        if e.min_numeric_tokens == 0 {
            return Err(invalid("extraction.min_numeric_tokens must be at least 1"));
        }
        for (name, ceiling) in [
            ("amount_ceiling", e.amount_ceiling),
            ("quantity_ceiling", e.quantity_ceiling),
            ("rate_ceiling", e.rate_ceiling),
        ] {
            if ceiling <= Decimal::ZERO {
                return Err(invalid(&format!("extraction.{} must be positive", name)));
            }
        }
        if e.consistency_tolerance.is_sign_negative() {
            return Err(invalid("extraction.consistency_tolerance must not be negative"));
        }
        if e.dedup_precision > 28 {
            return Err(invalid("extraction.dedup_precision must be at most 28"));
        }

        let t = &self.totals;
        if !(t.bucket_size.is_finite() && t.bucket_size > 0.0) {
            return Err(invalid("totals.bucket_size must be positive"));
        }
        if t.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("totals.keywords must not contain blank entries"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> BillscanError {
    BillscanError::Config(message.to_string())
}
