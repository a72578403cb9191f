//! Rule-based row filtering and line item assignment.

pub mod line_item;
pub mod numbers;
pub mod patterns;
pub mod row_filter;

pub use line_item::LineItemAssigner;
pub use numbers::{NumericToken, classify_token, parse_number, round_key};
pub use patterns::is_date_or_time;
pub use row_filter::{CandidateRow, RowClassifier};
