//! Language identification and filtering
//!
//! The recognized language set is closed: two alphabetic languages decided
//! by frequency-list membership and one logographic language decided by
//! script, plus `Unknown`.

mod filter;
mod frequency;
mod lemma;
mod segment;
mod vote;

pub use filter::filter_tokens;
pub use frequency::{FrequencyProvider, LanguageResources, WordListDirectory};
pub use lemma::{IdentityLemmatizer, Lemmatizer, LookupLemmatizer};
pub use segment::{DictSegmenter, Segmenter};
pub use vote::{tally, voting_lemmas, LanguageTally};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Danish,
    Chinese,
    Unknown,
}

impl Language {
    /// Voting order; ties resolve to the earliest entry
    pub const VOTING: [Language; 3] = [Language::English, Language::Danish, Language::Chinese];

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Danish => "da",
            Language::Chinese => "zh",
            Language::Unknown => "und",
        }
    }

    /// Whether tokens of this language are written without spaces
    pub fn is_logographic(&self) -> bool {
        matches!(self, Language::Chinese)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::English),
            "da" | "dan" | "danish" => Ok(Language::Danish),
            "zh" | "zho" | "chi" | "chinese" => Ok(Language::Chinese),
            "und" | "unknown" => Ok(Language::Unknown),
            other => Err(ResourceError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// CJK Unified Ideographs block
pub fn is_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Whether the text contains at least one CJK ideograph
pub fn contains_ideograph(text: &str) -> bool {
    text.chars().any(is_ideograph)
}

/// Errors loading language resources
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("No frequency list for {0}")]
    MissingFrequencyList(Language),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed resource line {line} in {path}")]
    Malformed { path: String, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::VOTING {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("Dansk".parse::<Language>().ok(), None);
    }

    #[test]
    fn test_ideograph_detection() {
        assert!(contains_ideograph("我爱你"));
        assert!(contains_ideograph("abc中"));
        assert!(!contains_ideograph("hund"));
        assert!(!contains_ideograph("ひらがな"));
    }
}
