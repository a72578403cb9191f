//! Totals reconciliation.
//!
//! Two independent figures: the total derived from the extracted items,
//! and the totals the document itself prints next to keywords such as
//! "grand total". Comparing them is left to the caller.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::parse_number;
use super::rules::patterns::TOTAL_AMOUNT;
use crate::models::bill::{LineItem, TotalsMap};
use crate::models::config::TotalsConfig;
use crate::ocr::Token;

/// Decimal places of the derived total.
const TOTAL_PRECISION: u32 = 2;

/// Computes the derived total and scans the text for declared totals.
#[derive(Debug, Clone)]
pub struct TotalsReconciler {
    keywords: Vec<String>,
    bucket_size: f64,
}

impl TotalsReconciler {
    /// Create a reconciler searching for `keywords` in buckets of `bucket_size`.
    pub fn new(keywords: Vec<String>, bucket_size: f64) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            bucket_size,
        }
    }

    /// Create a reconciler from totals settings.
    pub fn from_config(config: &TotalsConfig) -> Self {
        Self::new(config.keywords.clone(), config.bucket_size)
    }

    /// Sum of item amounts, rounded to cents. Saturates at `Decimal::MAX`.
    pub fn derived_total(&self, items: &[LineItem]) -> Decimal {
        items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.amount))
            .round_dp(TOTAL_PRECISION)
    }

    /// Find keyword-anchored totals in the raw token stream.
    ///
    /// Tokens are bucketed by `floor(cy / bucket_size)`, independently of row
    /// reconstruction. Buckets are visited in order of first appearance; the
    /// first bucket that yields a value for a keyword wins.
    pub fn find_totals<'a>(&self, tokens: impl IntoIterator<Item = &'a Token>) -> TotalsMap {
        let mut totals = TotalsMap::new();

        for line in self.bucket_lines(tokens) {
            let lower = line.to_lowercase();

            for keyword in &self.keywords {
                if totals.contains(keyword) || !lower.contains(keyword.as_str()) {
                    continue;
                }

                let Some(last) = TOTAL_AMOUNT.find_iter(&line).last() else {
                    continue;
                };

                if let Some(value) = parse_number(last.as_str()) {
                    debug!("Found {:?} = {} in {:?}", keyword, value, line);
                    totals.record(keyword, value);
                }
            }
        }

        totals
    }

    fn bucket_lines<'a>(&self, tokens: impl IntoIterator<Item = &'a Token>) -> Vec<String> {
        let mut index: HashMap<i64, usize> = HashMap::new();
        let mut buckets: Vec<Vec<&Token>> = Vec::new();

        for token in tokens {
            let key = (token.cy / self.bucket_size).floor() as i64;
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(token);
        }

        buckets
            .into_iter()
            .map(|mut bucket| {
                bucket.sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(Ordering::Equal));
                bucket
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl Default for TotalsReconciler {
    fn default() -> Self {
        Self::from_config(&TotalsConfig::default())
    }
}
