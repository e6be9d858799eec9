//! Resolver types

use serde::{Deserialize, Serialize};

/// Lookup tier that produced a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    /// Sense glosses from the lexical database
    Lexicon,
    /// Introductory dictionary article extract
    DictionaryExtract,
    /// Machine translation of the bare word
    RawTranslation,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Lexicon => "lexicon",
            SourceTier::DictionaryExtract => "dictionary_extract",
            SourceTier::RawTranslation => "raw_translation",
        }
    }
}

impl std::str::FromStr for SourceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicon" => Ok(SourceTier::Lexicon),
            "dictionary_extract" => Ok(SourceTier::DictionaryExtract),
            "raw_translation" => Ok(SourceTier::RawTranslation),
            other => Err(format!("unknown source tier: {}", other)),
        }
    }
}

/// Outcome of resolving one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Source-language article extract, only for the dictionary tier
    pub extract: Option<String>,
    /// Text shown to the reader; always populated
    pub display: String,
    pub tier: SourceTier,
}

/// A resolved word bound to its place in a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDefinition {
    pub word: String,
    pub definition: String,
    pub tier: SourceTier,
    pub book: String,
    pub page: u32,
}

impl ResolvedDefinition {
    pub fn new(word: &str, resolution: Resolution, book: &str, page: u32) -> Self {
        Self {
            word: word.to_string(),
            definition: resolution.display,
            tier: resolution.tier,
            book: book.to_string(),
            page,
        }
    }
}

/// One sense of a word in the lexical database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    pub synset: String,
    pub gloss: String,
}

/// Lookup failures (lexical database, dictionary service)
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Response(String),

    #[error("Failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid lexicon XML: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for LookupError {
    fn from(err: quick_xml::Error) -> Self {
        LookupError::Xml(err.to_string())
    }
}

/// Machine translation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty translation")]
    Empty,
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Request(err.to_string())
    }
}

impl TranslateError {
    /// Text embedded in place of a translation that failed
    pub fn placeholder(&self) -> String {
        format!("[Translation error: {}]", self)
    }
}
