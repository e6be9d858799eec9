//! Frequency gate
//!
//! Decides whether a candidate word is worth resolving: it must belong to
//! the study language's frequency list, and by default must not be one of
//! its most common words.

use serde::Serialize;

use crate::language::LanguageResources;

/// Surface forms this short never belong
const MIN_BELONGING_CHARS: usize = 3;

/// A filtered token with its lemma
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateWord {
    pub word: String,
    pub lemma: String,
    /// In the study language's full list and long enough
    pub belongs: bool,
}

/// What to do with a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateDecision {
    /// Resolve and store
    Translate,
    /// Belongs, but is among the common words the reader already knows
    Known,
    /// Not in the study language
    Foreign,
}

/// Gate bound to the study language's sets
pub struct FrequencyGate<'a> {
    resources: &'a LanguageResources,
    skip_common: bool,
}

impl<'a> FrequencyGate<'a> {
    pub fn new(resources: &'a LanguageResources, skip_common: bool) -> Self {
        Self {
            resources,
            skip_common,
        }
    }

    pub fn candidate(&self, word: &str, lemma: &str) -> CandidateWord {
        let lemma = lemma.to_lowercase();
        let belongs = self.resources.study_set().contains(&lemma)
            && word.chars().count() >= MIN_BELONGING_CHARS;

        CandidateWord {
            word: word.to_string(),
            lemma,
            belongs,
        }
    }

    pub fn decide(&self, candidate: &CandidateWord) -> GateDecision {
        if !candidate.belongs {
            GateDecision::Foreign
        } else if self.skip_common && self.resources.common().contains(&candidate.lemma) {
            GateDecision::Known
        } else {
            GateDecision::Translate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use std::collections::HashSet;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn resources() -> LanguageResources {
        LanguageResources::from_sets(
            set(&["the", "dog"]),
            set(&["og", "hund", "være", "hus", "gå"]),
            set(&["og", "være", "hus"]),
            Language::Danish,
        )
        .unwrap()
    }

    #[test]
    fn test_common_words_are_known_when_skipping() {
        let resources = resources();
        let gate = FrequencyGate::new(&resources, true);

        let hund = gate.candidate("Hund", "hund");
        assert!(hund.belongs);
        assert_eq!(gate.decide(&hund), GateDecision::Translate);

        let er = gate.candidate("var", "Være");
        assert_eq!(er.lemma, "være");
        assert_eq!(gate.decide(&er), GateDecision::Known);
    }

    #[test]
    fn test_common_words_translated_without_skipping() {
        let resources = resources();
        let gate = FrequencyGate::new(&resources, false);

        assert_eq!(gate.decide(&gate.candidate("hus", "hus")), GateDecision::Translate);
    }

    #[test]
    fn test_short_or_foreign_words_never_belong() {
        let resources = resources();
        let gate = FrequencyGate::new(&resources, false);

        // lemma is listed but the surface form is too short
        let gaa = gate.candidate("gå", "gå");
        assert!(!gaa.belongs);
        assert_eq!(gate.decide(&gaa), GateDecision::Foreign);

        assert_eq!(gate.decide(&gate.candidate("dog", "dog")), GateDecision::Foreign);
    }
}
