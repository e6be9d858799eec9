//! Token normalization and line grouping
//!
//! Cleans the raw OCR word table into tokens, drops entries that are empty
//! or consist only of symbols, and groups the survivors into lines keyed by
//! their (block, paragraph, line) position.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::types::{Line, LineKey, OcrPage, Token};

/// Everything that is neither a word character nor a CJK ideograph
static STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\u{4e00}-\u{9fff}]").expect("strip pattern"));

/// A page after normalization
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedPage {
    /// Lines in first-seen order
    pub lines: Vec<Line>,
    /// All kept tokens in engine order
    pub tokens: Vec<Token>,
    /// Rotation in degrees, 0 when the engine gave no usable estimate
    pub rotation: i32,
}

impl NormalizedPage {
    /// Token texts in page order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }

    /// Lines ordered by their position key
    pub fn sorted_lines(&self) -> Vec<&Line> {
        let mut lines: Vec<&Line> = self.lines.iter().collect();
        lines.sort_by_key(|l| l.key);
        lines
    }
}

/// Strip a raw token down to word characters and CJK ideographs
pub fn clean_token(raw: &str) -> String {
    STRIP_RE.replace_all(raw, "").into_owned()
}

/// Normalize an OCR page into lines and a flat token list
pub fn normalize(page: &OcrPage) -> NormalizedPage {
    let mut lines: Vec<Line> = Vec::new();
    let mut line_index: HashMap<LineKey, usize> = HashMap::new();
    let mut tokens = Vec::new();

    for (raw, position) in page.entries() {
        let text = clean_token(raw);
        if text.is_empty() {
            continue;
        }

        let token = Token { text, position };
        let key = position.line_key();
        let idx = *line_index.entry(key).or_insert_with(|| {
            lines.push(Line {
                key,
                tokens: Vec::new(),
            });
            lines.len() - 1
        });
        lines[idx].tokens.push(token.clone());
        tokens.push(token);
    }

    NormalizedPage {
        lines,
        tokens,
        rotation: page.rotation.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(words: &[(&str, u32, u32, u32)]) -> OcrPage {
        OcrPage::from_parallel(
            words.iter().map(|w| w.0.to_string()).collect(),
            words.iter().map(|w| w.1).collect(),
            words.iter().map(|w| w.2).collect(),
            words.iter().map(|w| w.3).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_clean_token() {
        assert_eq!(clean_token("hund,"), "hund");
        assert_eq!(clean_token("«går»"), "går");
        assert_eq!(clean_token("—"), "");
        assert_eq!(clean_token("中文。"), "中文");
        assert_eq!(clean_token("side_2"), "side_2");
    }

    #[test]
    fn test_symbol_only_tokens_are_dropped() {
        let normalized = normalize(&page(&[
            ("Jeg", 1, 1, 1),
            ("", 1, 1, 1),
            ("—", 1, 1, 1),
            ("hund.", 1, 1, 1),
        ]));

        assert_eq!(normalized.words().collect::<Vec<_>>(), vec!["Jeg", "hund"]);
        assert_eq!(normalized.lines.len(), 1);
        // positions still point into the raw table
        assert_eq!(normalized.tokens[1].position.index, 3);
    }

    #[test]
    fn test_lines_keep_first_seen_order() {
        let normalized = normalize(&page(&[
            ("b", 2, 1, 1),
            ("a", 1, 1, 1),
            ("c", 2, 1, 1),
        ]));

        let keys: Vec<_> = normalized.lines.iter().map(|l| l.key.block).collect();
        assert_eq!(keys, vec![2, 1]);
        assert_eq!(normalized.lines[0].text(), "b c");

        let sorted: Vec<_> = normalized.sorted_lines().iter().map(|l| l.key.block).collect();
        assert_eq!(sorted, vec![1, 2]);
    }

    #[test]
    fn test_missing_rotation_defaults_to_zero() {
        let normalized = normalize(&page(&[("hus", 1, 1, 1)]));
        assert_eq!(normalized.rotation, 0);

        let rotated = normalize(&page(&[("hus", 1, 1, 1)]).with_rotation(Some(180)));
        assert_eq!(rotated.rotation, 180);
    }
}
