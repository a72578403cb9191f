//! Token stream produced by the external OCR collaborator.
//!
//! Rasterization and recognition happen upstream; this module only models
//! what they hand over: one list of word-level tokens per page.

mod source;

pub use source::{JsonTokenSource, TokenSource, parse_token_dump};

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A recognized word with its axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenRecord")]
pub struct Token {
    /// Recognized text content.
    pub text: String,

    /// Left edge of the bounding box.
    pub left: f64,

    /// Top edge of the bounding box.
    pub top: f64,

    /// Bounding box width.
    pub width: f64,

    /// Bounding box height.
    pub height: f64,

    /// Recognition confidence as reported by the engine (-1 when unknown).
    #[serde(rename = "conf")]
    pub confidence: f64,

    /// Horizontal center.
    pub cx: f64,

    /// Vertical center.
    pub cy: f64,
}

impl Token {
    /// Create a token, deriving its center from the box.
    pub fn new(text: impl Into<String>, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            width,
            height,
            confidence: -1.0,
            cx: left + width / 2.0,
            cy: top + height / 2.0,
        }
    }

    /// Set the recognition confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    fn check_finite(&self, page: u32) -> Result<(), InputError> {
        let fields = [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
            ("cx", self.cx),
            ("cy", self.cy),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((field, _)) => Err(InputError::NonFinite {
                page,
                text: self.text.clone(),
                field: *field,
            }),
            None => Ok(()),
        }
    }
}

/// Wire form of a token; centers are optional and derived when missing.
#[derive(Debug, Deserialize)]
struct TokenRecord {
    text: String,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    #[serde(default = "unknown_confidence", alias = "confidence")]
    conf: f64,
    #[serde(default)]
    cx: Option<f64>,
    #[serde(default)]
    cy: Option<f64>,
}

fn unknown_confidence() -> f64 {
    -1.0
}

impl From<TokenRecord> for Token {
    fn from(record: TokenRecord) -> Self {
        Self {
            cx: record.cx.unwrap_or(record.left + record.width / 2.0),
            cy: record.cy.unwrap_or(record.top + record.height / 2.0),
            text: record.text,
            left: record.left,
            top: record.top,
            width: record.width,
            height: record.height,
            confidence: record.conf,
        }
    }
}

/// All tokens recognized on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    /// 1-based page number.
    pub page_no: u32,

    /// Tokens in whatever order the engine produced them.
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl OcrPage {
    /// Create a page from its tokens.
    pub fn new(page_no: u32, tokens: Vec<Token>) -> Self {
        Self { page_no, tokens }
    }

    /// Drop blank tokens and trim the rest, then check the geometry.
    pub fn normalized(mut self) -> Result<Self, InputError> {
        if self.page_no == 0 {
            return Err(InputError::InvalidPage(self.page_no));
        }

        self.tokens.retain_mut(|token| {
            let trimmed = token.text.trim();
            if trimmed.len() != token.text.len() {
                token.text = trimmed.to_string();
            }
            !token.text.is_empty()
        });

        for token in &self.tokens {
            token.check_finite(self.page_no)?;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_derived_when_missing() {
        let token: Token = serde_json::from_str(
            r#"{"text":"Total","left":10,"top":20,"width":40,"height":10,"conf":91.5}"#,
        )
        .unwrap();

        assert_eq!(token.center(), (30.0, 25.0));
        assert_eq!(token.confidence, 91.5);
    }

    #[test]
    fn test_explicit_center_kept() {
        let token: Token = serde_json::from_str(
            r#"{"text":"x","left":0,"top":0,"width":10,"height":10,"cx":1.5,"cy":2.5}"#,
        )
        .unwrap();

        assert_eq!(token.center(), (1.5, 2.5));
        assert_eq!(token.confidence, -1.0);
    }

    #[test]
    fn test_normalized_drops_blank_tokens() {
        let page = OcrPage::new(
            1,
            vec![
                Token::new("  ", 0.0, 0.0, 5.0, 5.0),
                Token::new(" Tea ", 0.0, 0.0, 5.0, 5.0),
            ],
        )
        .normalized()
        .unwrap();

        assert_eq!(page.tokens.len(), 1);
        assert_eq!(page.tokens[0].text, "Tea");
    }

    #[test]
    fn test_normalized_rejects_page_zero() {
        let err = OcrPage::new(0, Vec::new()).normalized().unwrap_err();
        assert!(matches!(err, InputError::InvalidPage(0)));
    }

    #[test]
    fn test_normalized_rejects_nan() {
        let page = OcrPage::new(2, vec![Token::new("Tea", f64::NAN, 0.0, 5.0, 5.0)]);
        let err = page.normalized().unwrap_err();
        assert!(matches!(err, InputError::NonFinite { page: 2, field: "left", .. }));
    }
}
