//! Core library for bill line item extraction.
//!
//! This crate provides:
//! - Token stream model for pages recognized by an external OCR engine
//! - Row reconstruction from unordered word boxes
//! - Line item assignment (name, quantity, rate, amount) with consistency checks
//! - Page and document level deduplication
//! - Derived and keyword-anchored document totals

pub mod bill;
pub mod error;
pub mod layout;
pub mod models;
pub mod ocr;

pub use bill::{BillExtractor, BillParser, Deduplicator, TotalsReconciler};
pub use error::{BillscanError, InputError, Rejection, Result};
pub use layout::{Row, RowReconstructor, guess_column_positions};
pub use models::bill::{BillData, BillResponse, ExtractionResult, LineItem, PageResult, TotalsMap};
pub use models::config::BillscanConfig;
pub use ocr::{JsonTokenSource, OcrPage, Token, TokenSource, parse_token_dump};
