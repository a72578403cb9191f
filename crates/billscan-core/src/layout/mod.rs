//! Spatial analysis of a page's tokens.

mod columns;
mod rows;

pub use columns::guess_column_positions;
pub use rows::{Row, RowReconstructor};
