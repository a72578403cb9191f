//! Token sources: the seam where recognized pages enter the core.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{OcrPage, Token};
use crate::error::{InputError, Result};

/// Anything that can hand over the recognized pages of one document.
pub trait TokenSource {
    /// Load all pages, normalized and in page order.
    fn pages(&self) -> Result<Vec<OcrPage>>;
}

/// Token dump stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonTokenSource {
    path: PathBuf,
}

impl JsonTokenSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the dump.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenSource for JsonTokenSource {
    fn pages(&self) -> Result<Vec<OcrPage>> {
        let content = std::fs::read_to_string(&self.path)?;
        debug!("Read token dump {} ({} bytes)", self.path.display(), content.len());
        parse_token_dump(&content)
    }
}

/// Accepted layouts of a token dump.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenDump {
    /// `[{"page_no": 1, "tokens": [...]}, ...]`
    Pages(Vec<OcrPage>),
    /// `{"pages": [...]}`
    Wrapped { pages: Vec<OcrPage> },
    /// `[[token, ...], [token, ...]]`, numbered from 1.
    Bare(Vec<Vec<Token>>),
}

/// Parse a JSON token dump into normalized pages.
pub fn parse_token_dump(json: &str) -> Result<Vec<OcrPage>> {
    let dump: TokenDump = serde_json::from_str(json).map_err(|e| {
        InputError::Format(format!("expected a page list or token lists ({})", e))
    })?;

    let pages = match dump {
        TokenDump::Pages(pages) | TokenDump::Wrapped { pages } => pages,
        TokenDump::Bare(lists) => lists
            .into_iter()
            .zip(1u32..)
            .map(|(tokens, page_no)| OcrPage::new(page_no, tokens))
            .collect(),
    };

    let mut pages = pages
        .into_iter()
        .map(OcrPage::normalized)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    pages.sort_by_key(|page| page.page_no);

    debug!(
        "Loaded {} page(s), {} token(s)",
        pages.len(),
        pages.iter().map(|p| p.tokens.len()).sum::<usize>()
    );

    Ok(pages)
}
