//! Candidate token filtering by majority language

use crate::ocr::NormalizedPage;

use super::{Language, LanguageResources, Segmenter};

/// Keep the tokens that plausibly belong to `language`.
///
/// Alphabetic languages keep tokens found in their frequency list, the
/// logographic language re-segments each line, and `Unknown` keeps
/// everything. Order and duplicates are preserved.
pub fn filter_tokens(
    page: &NormalizedPage,
    language: Language,
    resources: &LanguageResources,
    segmenter: &dyn Segmenter,
) -> Vec<String> {
    match language {
        Language::English | Language::Danish => page
            .words()
            .filter(|w| resources.is_member(language, w))
            .map(str::to_string)
            .collect(),
        Language::Chinese => page
            .lines
            .iter()
            .flat_map(|line| segmenter.segment(&line.joined()))
            .collect(),
        Language::Unknown => page.words().map(str::to_string).collect(),
    }
}
