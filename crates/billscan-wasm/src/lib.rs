//! WASM bindings for bill line item extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR runs on the JavaScript side; the recognized tokens are passed in.

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

use billscan_core::bill::rules::parse_number;
use billscan_core::models::config::BillscanConfig;
use billscan_core::{BillExtractor, BillParser, BillResponse, OcrPage, Token, parse_token_dump};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn respond(extractor: &BillExtractor, pages: &[OcrPage]) -> Result<JsValue, JsValue> {
    let result = extractor.parse(pages);
    serde_wasm_bindgen::to_value(&BillResponse::success(&result)).map_err(to_js_error)
}

/// Extract line items from a JSON token dump.
///
/// Accepts the same layouts as the CLI and returns the
/// `{is_success, token_usage, data}` response.
#[wasm_bindgen]
pub fn extract_bill_from_json(json: &str) -> Result<JsValue, JsValue> {
    let pages = parse_token_dump(json).map_err(to_js_error)?;
    respond(&BillExtractor::new().with_parallel(false), &pages)
}

/// Default configuration as a plain object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&BillscanConfig::default()).map_err(to_js_error)
}

/// Parse an OCR amount such as "1,234.50".
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    parse_number(amount).and_then(|d| d.to_f64())
}

/// Bill scanner with a fixed configuration.
#[wasm_bindgen]
pub struct BillScanner {
    extractor: BillExtractor,
}

#[wasm_bindgen]
impl BillScanner {
    /// Create a scanner with default thresholds.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: BillExtractor::new().with_parallel(false),
        }
    }

    /// Create a scanner from a configuration object.
    #[wasm_bindgen]
    pub fn with_config(config: JsValue) -> Result<BillScanner, JsValue> {
        let config: BillscanConfig =
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        config.validate().map_err(to_js_error)?;

        Ok(Self {
            extractor: BillExtractor::from_config(&config).with_parallel(false),
        })
    }

    /// Extract from a JSON token dump.
    #[wasm_bindgen]
    pub fn extract_json(&self, json: &str) -> Result<JsValue, JsValue> {
        let pages = parse_token_dump(json).map_err(to_js_error)?;
        respond(&self.extractor, &pages)
    }

    /// Extract from pages built token by token.
    #[wasm_bindgen]
    pub fn extract_pages(&self, pages: Vec<BillPage>) -> Result<JsValue, JsValue> {
        let mut normalized = pages
            .into_iter()
            .map(|p| p.page.normalized())
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js_error)?;
        normalized.sort_by_key(|p| p.page_no);

        respond(&self.extractor, &normalized)
    }
}

impl Default for BillScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of tokens recognized in the browser.
#[wasm_bindgen]
pub struct BillPage {
    page: OcrPage,
}

#[wasm_bindgen]
impl BillPage {
    #[wasm_bindgen(constructor)]
    pub fn new(page_no: u32) -> Self {
        Self {
            page: OcrPage::new(page_no, Vec::new()),
        }
    }

    /// Add a word box.
    #[wasm_bindgen]
    pub fn add_token(
        &mut self,
        text: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        confidence: f64,
    ) {
        self.page.tokens.push(
            Token::new(text, left, top, width, height).with_confidence(confidence),
        );
    }

    /// Number of tokens added so far.
    #[wasm_bindgen]
    pub fn token_count(&self) -> usize {
        self.page.tokens.len()
    }
}
