//! Lemmatization
//!
//! Maps inflected word-forms to their base form. The morphological analysis
//! itself is external; a lookup table exported from it is enough here.

use std::collections::HashMap;
use std::path::Path;

use super::ResourceError;

/// Word-form to lemma mapping
pub trait Lemmatizer: Send + Sync {
    /// Base form of a single word
    fn lemma(&self, word: &str) -> String;

    /// One lemma per word, in input order
    fn lemmas(&self, words: &[&str]) -> Vec<String> {
        words.iter().map(|w| self.lemma(w)).collect()
    }
}

/// Returns every word unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemma(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Table-driven lemmatizer
///
/// Reads `form<TAB>lemma` lines. Lookups are case-insensitive; forms not in
/// the table are their own lemma.
#[derive(Debug, Default, Clone)]
pub struct LookupLemmatizer {
    table: HashMap<String, String>,
}

impl LookupLemmatizer {
    pub fn from_path(path: &Path) -> Result<Self, ResourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ResourceError> {
        let mut table = HashMap::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (form, lemma) = line.split_once('\t').ok_or_else(|| ResourceError::Malformed {
                path: origin.to_string(),
                line: i + 1,
            })?;
            table.insert(form.trim().to_lowercase(), lemma.trim().to_string());
        }

        tracing::debug!(entries = table.len(), "Loaded lemma table from {}", origin);
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(String, String)> for LookupLemmatizer {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            table: iter
                .into_iter()
                .map(|(form, lemma)| (form.to_lowercase(), lemma))
                .collect(),
        }
    }
}

impl Lemmatizer for LookupLemmatizer {
    fn lemma(&self, word: &str) -> String {
        self.table
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_else(|| word.to_string())
    }
}
