//! Bill line item extraction and totals reconciliation.

pub mod dedup;
mod extractor;
pub mod rules;
pub mod totals;

pub use dedup::Deduplicator;
pub use extractor::BillExtractor;
pub use totals::TotalsReconciler;

use crate::models::bill::ExtractionResult;
use crate::ocr::OcrPage;

/// Trait for turning recognized pages into bill data.
///
/// Extraction never fails: rows that do not qualify are dropped and an
/// empty page simply yields no items.
pub trait BillParser {
    /// Extract line items and totals from all pages of a document.
    fn parse(&self, pages: &[OcrPage]) -> ExtractionResult;
}
