//! Majority language voting
//!
//! Each distinct lemma on a page casts at most one vote: English list
//! first, then Danish list, then CJK script. The first matching rule wins,
//! so a lemma present in both lists always counts as English.

use std::collections::HashSet;

use serde::Serialize;

use super::{contains_ideograph, Language, LanguageResources, Lemmatizer};

/// Tokens this short never vote
const MIN_VOTING_CHARS: usize = 3;

/// Vote counts per recognized language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageTally {
    pub english: usize,
    pub danish: usize,
    pub chinese: usize,
}

impl LanguageTally {
    pub fn count(&self, language: Language) -> usize {
        match language {
            Language::English => self.english,
            Language::Danish => self.danish,
            Language::Chinese => self.chinese,
            Language::Unknown => 0,
        }
    }

    fn add(&mut self, language: Language) {
        match language {
            Language::English => self.english += 1,
            Language::Danish => self.danish += 1,
            Language::Chinese => self.chinese += 1,
            Language::Unknown => {}
        }
    }

    pub fn total(&self) -> usize {
        self.english + self.danish + self.chinese
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Language with the highest count; ties go to the earlier language in
    /// voting order. An empty tally yields English.
    pub fn majority(&self) -> Language {
        let mut best = Language::VOTING[0];
        for lang in Language::VOTING.into_iter().skip(1) {
            if self.count(lang) > self.count(best) {
                best = lang;
            }
        }
        best
    }

    /// Like [`majority`](Self::majority), but `None` when nothing voted
    pub fn detected(&self) -> Option<Language> {
        if self.is_empty() {
            None
        } else {
            Some(self.majority())
        }
    }
}

/// Distinct lemmas of the page's voting-eligible tokens
pub fn voting_lemmas<'a>(
    words: impl IntoIterator<Item = &'a str>,
    lemmatizer: &dyn Lemmatizer,
) -> HashSet<String> {
    let eligible: Vec<&str> = words
        .into_iter()
        .filter(|w| w.chars().count() >= MIN_VOTING_CHARS)
        .collect();
    lemmatizer.lemmas(&eligible).into_iter().collect()
}

fn classify(lemma: &str, resources: &LanguageResources) -> Option<Language> {
    let lower = lemma.to_lowercase();
    let in_list = |lang: Language| {
        resources
            .membership(lang)
            .map(|set| set.contains(&lower))
            .unwrap_or(false)
    };

    if in_list(Language::English) {
        Some(Language::English)
    } else if in_list(Language::Danish) {
        Some(Language::Danish)
    } else if contains_ideograph(lemma) {
        Some(Language::Chinese)
    } else {
        None
    }
}

/// Tally votes for a set of lemmas
pub fn tally<'a>(
    lemmas: impl IntoIterator<Item = &'a String>,
    resources: &LanguageResources,
) -> LanguageTally {
    let mut votes = LanguageTally::default();
    for lemma in lemmas {
        if let Some(lang) = classify(lemma, resources) {
            votes.add(lang);
        }
    }
    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{IdentityLemmatizer, LookupLemmatizer};

    fn resources(english: &[&str], danish: &[&str]) -> LanguageResources {
        LanguageResources::from_sets(
            english.iter().map(|w| w.to_string()).collect(),
            danish.iter().map(|w| w.to_string()).collect(),
            HashSet::new(),
            Language::Danish,
        )
        .unwrap()
    }

    #[test]
    fn test_danish_page_wins_when_english_list_is_empty() {
        let res = resources(&[], &["hund", "hus", "gå"]);
        let lemmatizer: LookupLemmatizer = vec![("går".to_string(), "gå".to_string())]
            .into_iter()
            .collect();

        let lemmas = voting_lemmas(["hund", "hus", "går"], &lemmatizer);
        let votes = tally(&lemmas, &res);

        assert_eq!(votes.danish, 3);
        assert_eq!(votes.majority(), Language::Danish);
    }

    #[test]
    fn test_short_tokens_do_not_vote() {
        let lemmas = voting_lemmas(["i", "og", "hus"], &IdentityLemmatizer);
        assert_eq!(lemmas.len(), 1);
        assert!(lemmas.contains("hus"));
    }

    #[test]
    fn test_shared_lemma_counts_as_english() {
        let res = resources(&["hand"], &["hand"]);
        let lemmas: HashSet<String> = ["hand".to_string()].into_iter().collect();
        let votes = tally(&lemmas, &res);
        assert_eq!(votes, LanguageTally { english: 1, danish: 0, chinese: 0 });
    }

    #[test]
    fn test_ideographs_vote_chinese() {
        let res = resources(&["the"], &[]);
        let lemmas = voting_lemmas(["我喜欢", "中文字", "The"], &IdentityLemmatizer);
        let votes = tally(&lemmas, &res);
        assert_eq!(votes.chinese, 2);
        assert_eq!(votes.english, 1);
        assert_eq!(votes.majority(), Language::Chinese);
    }

    #[test]
    fn test_ties_follow_voting_order() {
        let tie = LanguageTally { english: 0, danish: 2, chinese: 2 };
        assert_eq!(tie.majority(), Language::Danish);

        let all = LanguageTally { english: 1, danish: 1, chinese: 1 };
        assert_eq!(all.majority(), Language::English);
    }

    #[test]
    fn test_empty_tally() {
        let empty = LanguageTally::default();
        assert_eq!(empty.majority(), Language::English);
        assert_eq!(empty.detected(), None);

        let some = LanguageTally { english: 0, danish: 1, chinese: 0 };
        assert_eq!(some.detected(), Some(Language::Danish));
    }
}
