//! Word segmentation for logographic text
//!
//! Chinese is written without spaces, so OCR tokens are usually whole
//! phrases. The segmenter splits them back into words with a
//! dictionary-driven maximum-probability route over all dictionary prefix
//! matches.

use std::collections::HashMap;
use std::path::Path;

use super::{is_ideograph, ResourceError};

/// Splits text into words
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Frequency-dictionary segmenter
///
/// Dictionary lines are `word freq [tag]`. Characters not covered by any
/// dictionary word become single-character words; runs of other scripts
/// are kept whole.
#[derive(Debug, Clone, Default)]
pub struct DictSegmenter {
    freq: HashMap<String, u64>,
    total: u64,
    max_word_chars: usize,
}

impl DictSegmenter {
    pub fn from_path(path: &Path) -> Result<Self, ResourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ResourceError> {
        let mut entries = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let freq = match fields.next() {
                Some(f) => f.parse::<u64>().map_err(|_| ResourceError::Malformed {
                    path: origin.to_string(),
                    line: i + 1,
                })?,
                None => 1,
            };
            entries.push((word.to_string(), freq));
        }

        tracing::debug!(entries = entries.len(), "Loaded segmentation dictionary from {}", origin);
        Ok(entries.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    fn log_freq(&self, word: &str) -> f64 {
        let freq = self.freq.get(word).copied().unwrap_or(1).max(1);
        (freq as f64).ln() - (self.total.max(1) as f64).ln()
    }

    /// Best split of a run of ideographs
    fn segment_run(&self, run: &[char], out: &mut Vec<String>) {
        let n = run.len();
        // best[i] = (score of run[i..], end of the first word starting at i)
        let mut best = vec![(0.0_f64, n); n + 1];

        for i in (0..n).rev() {
            let mut choice: Option<(f64, usize)> = None;
            let limit = n.min(i + self.max_word_chars.max(1));
            for end in i + 1..=limit {
                let word: String = run[i..end].iter().collect();
                if end > i + 1 && !self.freq.contains_key(&word) {
                    continue;
                }
                let score = self.log_freq(&word) + best[end].0;
                // on equal scores prefer the longer word
                if choice.map_or(true, |(s, _)| score >= s) {
                    choice = Some((score, end));
                }
            }
            best[i] = choice.unwrap_or((self.log_freq(&run[i].to_string()), i + 1));
        }

        let mut i = 0;
        while i < n {
            let end = best[i].1;
            out.push(run[i..end].iter().collect());
            i = end;
        }
    }
}

impl FromIterator<(String, u64)> for DictSegmenter {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut segmenter = DictSegmenter::default();
        for (word, freq) in iter {
            segmenter.max_word_chars = segmenter.max_word_chars.max(word.chars().count());
            segmenter.total += freq;
            segmenter.freq.insert(word, freq);
        }
        segmenter
    }
}

impl Segmenter for DictSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut run: Vec<char> = Vec::new();
        let mut other = String::new();

        for c in text.chars() {
            if is_ideograph(c) {
                if !other.is_empty() {
                    words.push(std::mem::take(&mut other));
                }
                run.push(c);
                continue;
            }

            if !run.is_empty() {
                self.segment_run(&run, &mut words);
                run.clear();
            }
            if c.is_whitespace() {
                if !other.is_empty() {
                    words.push(std::mem::take(&mut other));
                }
            } else {
                other.push(c);
            }
        }

        if !run.is_empty() {
            self.segment_run(&run, &mut words);
        }
        if !other.is_empty() {
            words.push(other);
        }
        words
    }
}
