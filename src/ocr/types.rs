//! OCR Types
//!
//! Defines the page-level word table produced by an OCR engine and the
//! normalized token/line structures derived from it.

use serde::{Deserialize, Serialize};

/// Raw OCR output for one page.
///
/// Mirrors the engine's word table: parallel arrays of token text and
/// block/paragraph/line indices, plus an optional rotation estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrPage {
    text: Vec<String>,
    block_num: Vec<u32>,
    par_num: Vec<u32>,
    line_num: Vec<u32>,
    /// Detected rotation in degrees, if the engine reported one
    #[serde(default)]
    pub rotation: Option<i32>,
}

impl OcrPage {
    /// Build a page from parallel arrays, rejecting arrays of unequal length
    pub fn from_parallel(
        text: Vec<String>,
        block_num: Vec<u32>,
        par_num: Vec<u32>,
        line_num: Vec<u32>,
    ) -> Result<Self, OcrError> {
        let len = text.len();
        if block_num.len() != len || par_num.len() != len || line_num.len() != len {
            return Err(OcrError::MalformedOutput(format!(
                "word table arrays differ in length: text={}, block={}, par={}, line={}",
                len,
                block_num.len(),
                par_num.len(),
                line_num.len()
            )));
        }

        Ok(Self {
            text,
            block_num,
            par_num,
            line_num,
            rotation: None,
        })
    }

    /// Attach a rotation estimate
    pub fn with_rotation(mut self, rotation: Option<i32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Number of raw entries (including blank ones)
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Iterate raw entries with their positions, in engine order
    pub fn entries(&self) -> impl Iterator<Item = (&str, TokenPosition)> + '_ {
        self.text.iter().enumerate().map(move |(i, text)| {
            (
                text.as_str(),
                TokenPosition {
                    block: self.block_num[i],
                    paragraph: self.par_num[i],
                    line: self.line_num[i],
                    index: i,
                },
            )
        })
    }
}

/// Position of a token on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPosition {
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    /// Index of the entry in the engine's word table
    pub index: usize,
}

impl TokenPosition {
    pub fn line_key(&self) -> LineKey {
        LineKey {
            block: self.block,
            paragraph: self.paragraph,
            line: self.line,
        }
    }
}

/// (block, paragraph, line) triple identifying a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

/// Normalized token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub position: TokenPosition,
}

/// Tokens sharing one line, in reading order
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub key: LineKey,
    pub tokens: Vec<Token>,
}

impl Line {
    /// Line text with tokens separated by spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tokens concatenated without separators
    pub fn joined(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Failed to prepare image: {0}")]
    ImageError(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Malformed OCR output: {0}")]
    MalformedOutput(String),

    #[error("No rotation estimate in orientation output")]
    MissingRotation,
}
