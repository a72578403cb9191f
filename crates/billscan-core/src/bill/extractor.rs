//! Bill extraction pipeline.
//!
//! Per page: rows → classified rows → line items → page dedup. Per
//! document: document dedup, derived total and keyword totals.

use std::time::Instant;

use tracing::{debug, info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::BillParser;
use super::dedup::Deduplicator;
use super::rules::{LineItemAssigner, RowClassifier};
use super::totals::TotalsReconciler;
use crate::layout::RowReconstructor;
use crate::models::bill::{ExtractionResult, LineItem, PageResult};
use crate::models::config::BillscanConfig;
use crate::ocr::{OcrPage, Token};

/// Rule-based bill extractor.
#[derive(Debug, Clone)]
pub struct BillExtractor {
    rows: RowReconstructor,
    classifier: RowClassifier,
    assigner: LineItemAssigner,
    dedup: Deduplicator,
    reconciler: TotalsReconciler,
    parallel: bool,
}

impl BillExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&BillscanConfig::default())
    }

    /// Create an extractor from a configuration.
    pub fn from_config(config: &BillscanConfig) -> Self {
        Self {
            rows: RowReconstructor::from_config(&config.extraction),
            classifier: RowClassifier::from_config(&config.extraction),
            assigner: LineItemAssigner::from_config(&config.extraction),
            dedup: Deduplicator::from_config(&config.extraction),
            reconciler: TotalsReconciler::from_config(&config.totals),
            parallel: true,
        }
    }

    /// Process pages in parallel (only with the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Extract the page-level deduplicated items of one page.
    pub fn extract_page(&self, page_no: u32, tokens: &[Token]) -> PageResult {
        let rows = self.rows.reconstruct(tokens);
        let row_count = rows.len();

        let candidates: Vec<LineItem> = rows
            .iter()
            .filter_map(|row| {
                let outcome = self
                    .classifier
                    .classify(row)
                    .and_then(|candidate| self.assigner.assign(&candidate));
                match outcome {
                    Ok(item) => Some(item),
                    Err(reason) => {
                        trace!("Page {}: skipping {:?}: {}", page_no, row.line(), reason);
                        None
                    }
                }
            })
            .collect();

        let found = candidates.len();
        let items = self.dedup.dedup(candidates);

        debug!(
            "Page {}: {} tokens, {} rows, {} items ({} after dedup)",
            page_no,
            tokens.len(),
            row_count,
            found,
            items.len()
        );

        PageResult::new(page_no, items)
    }

    /// Extract all pages of a document and reconcile totals.
    pub fn extract_document(&self, pages: &[OcrPage]) -> ExtractionResult {
        let start = Instant::now();

        let page_results = self.extract_pages(pages);

        let items = self
            .dedup
            .dedup(page_results.iter().flat_map(|p| p.items.iter().cloned()));
        let final_total = self.reconciler.derived_total(&items);
        let totals = self
            .reconciler
            .find_totals(pages.iter().flat_map(|p| p.tokens.iter()));

        info!(
            "Extracted {} unique items from {} page(s), total {}, {} keyword total(s) in {:?}",
            items.len(),
            pages.len(),
            final_total,
            totals.len(),
            start.elapsed()
        );

        ExtractionResult {
            pages: page_results,
            items,
            final_total,
            totals,
        }
    }

    #[cfg(feature = "parallel")]
    fn extract_pages(&self, pages: &[OcrPage]) -> Vec<PageResult> {
        if self.parallel && pages.len() > 1 {
            pages
                .par_iter()
                .map(|page| self.extract_page(page.page_no, &page.tokens))
                .collect()
        } else {
            self.extract_pages_sequential(pages)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn extract_pages(&self, pages: &[OcrPage]) -> Vec<PageResult> {
        self.extract_pages_sequential(pages)
    }

    fn extract_pages_sequential(&self, pages: &[OcrPage]) -> Vec<PageResult> {
        pages
            .iter()
            .map(|page| self.extract_page(page.page_no, &page.tokens))
            .collect()
    }
}

impl Default for BillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BillParser for BillExtractor {
    fn parse(&self, pages: &[OcrPage]) -> ExtractionResult {
        self.extract_document(pages)
    }
}
