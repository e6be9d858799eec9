//! Word frequency lists
//!
//! A frequency list is the N most common word-forms of a language. Two
//! sizes are used: a large list for "is this a word of language X" and a
//! small one for "the reader surely knows this word".

use std::collections::HashSet;
use std::path::PathBuf;

use super::{Language, ResourceError};

/// Source of ranked word lists
pub trait FrequencyProvider: Send + Sync {
    /// The `n` most frequent word-forms of `language`, lower-cased
    fn top_n(&self, language: Language, n: usize) -> Result<HashSet<String>, ResourceError>;
}

/// Ranked word lists stored as `<root>/<code>.txt`
///
/// One word per line, most frequent first. Anything after a tab (a count,
/// usually) is ignored, as are blank lines and `#` comments.
pub struct WordListDirectory {
    root: PathBuf,
}

impl WordListDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, language: Language) -> PathBuf {
        self.root.join(format!("{}.txt", language.code()))
    }
}

impl FrequencyProvider for WordListDirectory {
    fn top_n(&self, language: Language, n: usize) -> Result<HashSet<String>, ResourceError> {
        let path = self.path_for(language);
        if !path.exists() {
            return Err(ResourceError::MissingFrequencyList(language));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ResourceError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let words: HashSet<String> = content
            .lines()
            .map(|l| l.split('\t').next().unwrap_or("").trim())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .take(n)
            .map(|w| w.to_lowercase())
            .collect();

        tracing::debug!(language = %language, requested = n, loaded = words.len(), "Loaded frequency list");
        Ok(words)
    }
}

/// Frequency sets used by voting, filtering and gating
#[derive(Debug, Clone)]
pub struct LanguageResources {
    english: HashSet<String>,
    danish: HashSet<String>,
    /// Most common words of the study language
    common: HashSet<String>,
    study: Language,
}

impl LanguageResources {
    /// Load membership sets for both alphabetic languages and the common
    /// set for the study language
    pub fn load(
        provider: &dyn FrequencyProvider,
        study: Language,
        membership_size: usize,
        common_size: usize,
    ) -> Result<Self, ResourceError> {
        let english = provider.top_n(Language::English, membership_size)?;
        let danish = provider.top_n(Language::Danish, membership_size)?;
        let common = provider.top_n(study, common_size)?;

        Self::from_sets(english, danish, common, study)
    }

    /// Build from ready-made sets
    pub fn from_sets(
        english: HashSet<String>,
        danish: HashSet<String>,
        common: HashSet<String>,
        study: Language,
    ) -> Result<Self, ResourceError> {
        let resources = Self {
            english,
            danish,
            common,
            study,
        };
        if resources.membership(study).is_none() {
            return Err(ResourceError::MissingFrequencyList(study));
        }
        Ok(resources)
    }

    /// Membership set of an alphabetic language
    pub fn membership(&self, language: Language) -> Option<&HashSet<String>> {
        match language {
            Language::English => Some(&self.english),
            Language::Danish => Some(&self.danish),
            Language::Chinese | Language::Unknown => None,
        }
    }

    /// Whether the lower-cased word is in the language's membership set
    pub fn is_member(&self, language: Language, word: &str) -> bool {
        self.membership(language)
            .map(|set| set.contains(&word.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn study_language(&self) -> Language {
        self.study
    }

    /// Membership set of the study language
    pub fn study_set(&self) -> &HashSet<String> {
        // validated at construction
        self.membership(self.study).unwrap_or(&self.danish)
    }

    /// Common-word set of the study language
    pub fn common(&self) -> &HashSet<String> {
        &self.common
    }
}
