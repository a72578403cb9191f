//! Row reconstruction: cluster unordered tokens into text lines.
//!
//! Tokens are visited top to bottom and attached to the first existing row
//! whose mean vertical center lies within the tolerance. The result depends
//! on visiting order, so the order here is part of the behavior.

use std::cmp::Ordering;

use tracing::trace;

use crate::models::config::ExtractionConfig;
use crate::ocr::Token;

/// Tokens judged to sit on the same line of the page.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    tokens: Vec<&'a Token>,
    cy_sum: f64,
}

impl<'a> Row<'a> {
    fn start(token: &'a Token) -> Self {
        Self {
            tokens: vec![token],
            cy_sum: token.cy,
        }
    }

    fn push(&mut self, token: &'a Token) {
        self.tokens.push(token);
        self.cy_sum += token.cy;
    }

    /// Mean vertical center of the members.
    pub fn mean_cy(&self) -> f64 {
        self.cy_sum / self.tokens.len() as f64
    }

    /// Members, left to right.
    pub fn tokens(&self) -> &[&'a Token] {
        &self.tokens
    }

    /// Member texts, left to right.
    pub fn texts(&self) -> Vec<&'a str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Member texts joined with single spaces.
    pub fn line(&self) -> String {
        self.texts().join(" ").trim().to_string()
    }

    /// Number of member tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the row has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Greedy single-pass row clustering.
#[derive(Debug, Clone)]
pub struct RowReconstructor {
    tolerance: f64,
}

impl RowReconstructor {
    /// Create a reconstructor with the given vertical tolerance.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Create a reconstructor from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.row_tolerance)
    }

    /// Group `tokens` into rows.
    ///
    /// Every token lands in exactly one row. Rows come back in creation
    /// order, which is roughly top to bottom because tokens are visited by
    /// ascending vertical center.
    pub fn reconstruct<'a>(&self, tokens: &'a [Token]) -> Vec<Row<'a>> {
        let mut ordered: Vec<&Token> = tokens.iter().collect();
        ordered.sort_by(|a, b| a.cy.partial_cmp(&b.cy).unwrap_or(Ordering::Equal));

        let mut rows: Vec<Row<'a>> = Vec::new();

        for token in ordered {
            match rows
                .iter_mut()
                .find(|row| (row.mean_cy() - token.cy).abs() < self.tolerance)
            {
                Some(row) => row.push(token),
                None => rows.push(Row::start(token)),
            }
        }

        for row in &mut rows {
            row.tokens
                .sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(Ordering::Equal));
        }

        trace!("Clustered {} tokens into {} rows", tokens.len(), rows.len());

        rows
    }
}

impl Default for RowReconstructor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
