//! Row classification: decide which rows can carry a line item.

use rust_decimal::Decimal;

use super::numbers::{NumericToken, classify_token};
use super::patterns::is_date_or_time;
use crate::error::Rejection;
use crate::layout::Row;
use crate::models::config::ExtractionConfig;

/// A row that passed classification, with its tokens tagged.
#[derive(Debug, Clone)]
pub struct CandidateRow<'a> {
    texts: Vec<&'a str>,
    tags: Vec<NumericToken>,
}

impl<'a> CandidateRow<'a> {
    /// Token texts, left to right.
    pub fn texts(&self) -> &[&'a str] {
        &self.texts
    }

    /// Values of the numeric tokens, left to right.
    pub fn numbers(&self) -> Vec<Decimal> {
        self.tags.iter().filter_map(|t| t.value()).collect()
    }

    /// Index of the first numeric token.
    pub fn first_number_index(&self) -> Option<usize> {
        self.tags.iter().position(|t| t.is_number())
    }
}

/// Filters out rows that cannot be line items.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    min_numeric_tokens: usize,
}

impl RowClassifier {
    /// Create a classifier requiring `min_numeric_tokens` numbers per row.
    pub fn new(min_numeric_tokens: usize) -> Self {
        Self { min_numeric_tokens }
    }

    /// Create a classifier from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.min_numeric_tokens)
    }

    /// Classify a reconstructed row.
    pub fn classify<'a>(&self, row: &Row<'a>) -> Result<CandidateRow<'a>, Rejection> {
        self.classify_texts(row.texts())
    }

    /// Classify a row given as its token texts, left to right.
    pub fn classify_texts<'a>(&self, texts: Vec<&'a str>) -> Result<CandidateRow<'a>, Rejection> {
        let line = texts.join(" ");
        if is_date_or_time(line.trim()) {
            return Err(Rejection::DateOrTime);
        }

        let tags: Vec<NumericToken> = texts.iter().map(|t| classify_token(t)).collect();
        let found = tags.iter().filter(|t| t.is_number()).count();
        if found < self.min_numeric_tokens {
            return Err(Rejection::TooFewNumbers {
                found,
                required: self.min_numeric_tokens,
            });
        }

        Ok(CandidateRow { texts, tags })
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
