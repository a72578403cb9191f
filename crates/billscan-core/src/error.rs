//! Error types for the billscan-core library.
//!
//! Extraction itself never fails: a row that cannot become a line item is
//! dropped with a [`Rejection`] reason that only ever reaches the logs.
//! [`BillscanError`] covers the edges of the pipeline (token input,
//! configuration and file I/O).

use thiserror::Error;

/// Main error type for the billscan library.
#[derive(Error, Debug)]
pub enum BillscanError {
    /// Token input could not be decoded.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the token stream handed over by the OCR collaborator.
#[derive(Error, Debug)]
pub enum InputError {
    /// The payload is neither a page list nor a list of token lists.
    #[error("unrecognized token dump: {0}")]
    Format(String),

    /// Page numbers are 1-based.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// A token carries a non-finite coordinate.
    #[error("token {text:?} on page {page} has a non-finite {field}")]
    NonFinite {
        page: u32,
        text: String,
        field: &'static str,
    },
}

/// Why a row produced no line item.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The row reads as a date or a time of day.
    #[error("row looks like a date or time")]
    DateOrTime,

    /// Not enough numeric tokens to assign an amount.
    #[error("{found} numeric token(s), need {required}")]
    TooFewNumbers { found: usize, required: usize },

    /// The amount is zero or negative.
    #[error("amount {0} is not positive")]
    NonPositiveAmount(String),

    /// The amount is above the configured ceiling.
    #[error("amount {amount} exceeds ceiling {ceiling}")]
    AmountAboveCeiling { amount: String, ceiling: String },

    /// `quantity * rate` is too far from the amount.
    #[error("{quantity} x {rate} is inconsistent with amount {amount}")]
    Inconsistent {
        quantity: String,
        rate: String,
        amount: String,
    },

    /// The name is too short after cleanup.
    #[error("name {0:?} is too short")]
    NameTooShort(String),

    /// The name is a stoplisted word.
    #[error("name {0:?} is stoplisted")]
    StoplistedName(String),

    /// The name is made of digits only.
    #[error("name {0:?} is numeric")]
    NumericName(String),
}

/// Result type for the billscan library.
pub type Result<T> = std::result::Result<T, BillscanError>;
