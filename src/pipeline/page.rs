//! Single-page processing
//!
//! A page goes through normalization, language voting, token filtering,
//! the frequency gate, resolution and persistence, in that order.

use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;

use super::gate::{FrequencyGate, GateDecision};
use crate::db::VocabRepository;
use crate::error::Result;
use crate::language::{
    filter_tokens, tally, voting_lemmas, Language, LanguageResources, LanguageTally, Lemmatizer,
    Segmenter,
};
use crate::ocr::{normalize, NormalizedPage, OcrPage};
use crate::resolver::{ResolvedDefinition, TranslationResolver};

/// Per-run switches
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Treat the study language's most common words as known
    pub skip_common: bool,
    /// Skip the lexical database tier
    pub fast_mode: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            skip_common: true,
            fast_mode: false,
        }
    }
}

/// Result of the I/O-free part of page processing
#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    pub page: NormalizedPage,
    pub tally: LanguageTally,
    pub language: Language,
    /// Filtered tokens in page order, duplicates kept
    pub candidates: Vec<String>,
}

/// Counts for one processed page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page_number: u32,
    pub language: Option<Language>,
    pub tokens: usize,
    pub candidates: usize,
    pub foreign: usize,
    pub known: usize,
    pub duplicates: usize,
    pub stored: usize,
}

/// Page processor sharing language resources and the resolver
pub struct PageProcessor {
    resources: Arc<LanguageResources>,
    lemmatizer: Arc<dyn Lemmatizer>,
    segmenter: Arc<dyn Segmenter>,
    resolver: Arc<TranslationResolver>,
    options: PipelineOptions,
}

impl PageProcessor {
    pub fn new(
        resources: Arc<LanguageResources>,
        lemmatizer: Arc<dyn Lemmatizer>,
        segmenter: Arc<dyn Segmenter>,
        resolver: Arc<TranslationResolver>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resources,
            lemmatizer,
            segmenter,
            resolver,
            options,
        }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Normalize, vote and filter a recognized page
    pub fn analyze(&self, ocr: &OcrPage) -> PageAnalysis {
        let page = normalize(ocr);
        let lemmas = voting_lemmas(page.words(), self.lemmatizer.as_ref());
        let tally = tally(&lemmas, &self.resources);
        let language = tally.detected().unwrap_or(Language::Unknown);
        let candidates = filter_tokens(&page, language, &self.resources, self.segmenter.as_ref());

        PageAnalysis {
            page,
            tally,
            language,
            candidates,
        }
    }

    /// Analyze a page, then resolve and store its new study-language words
    pub async fn process(
        &self,
        pool: &SqlitePool,
        book: &str,
        page_number: u32,
        ocr: &OcrPage,
    ) -> Result<PageReport> {
        let analysis = self.analyze(ocr);
        let mut report = PageReport {
            page_number,
            language: analysis.tally.detected(),
            tokens: analysis.page.tokens.len(),
            candidates: analysis.candidates.len(),
            ..Default::default()
        };

        tracing::debug!(
            page = page_number,
            english = analysis.tally.english,
            danish = analysis.tally.danish,
            chinese = analysis.tally.chinese,
            language = %analysis.language,
            "Page language voted"
        );

        let gate = FrequencyGate::new(&self.resources, self.options.skip_common);
        let repo = VocabRepository::new(pool);

        for word in &analysis.candidates {
            let lemma = self.lemmatizer.lemma(word);
            let candidate = gate.candidate(word, &lemma);

            match gate.decide(&candidate) {
                GateDecision::Foreign => report.foreign += 1,
                GateDecision::Known => {
                    tracing::debug!(word = %candidate.word, "Skipping common word");
                    report.known += 1;
                }
                GateDecision::Translate => {
                    if repo.exists(word, book, page_number).await? {
                        report.duplicates += 1;
                        continue;
                    }

                    let resolution = self.resolver.resolve(word, self.options.fast_mode).await;
                    let definition = ResolvedDefinition::new(word, resolution, book, page_number);
                    if repo.insert_if_absent(&definition).await? {
                        tracing::debug!(word = %word, tier = definition.tier.as_str(), "Stored word");
                        report.stored += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
            }
        }

        tracing::info!(
            book,
            page = page_number,
            tokens = report.tokens,
            candidates = report.candidates,
            stored = report.stored,
            "Page processed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;
    use crate::language::{DictSegmenter, IdentityLemmatizer, LookupLemmatizer};
    use crate::resolver::{
        DictionaryService, LookupError, ResolverConfig, TranslateError, Translator,
    };
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoArticles;

    #[async_trait]
    impl DictionaryService for NoArticles {
        async fn extract(&self, _word: &str) -> std::result::Result<Option<String>, LookupError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for Echo {
        async fn translate(
            &self,
            text: &str,
            _source: Language,
            _target: Language,
        ) -> std::result::Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("en:{}", text))
        }
    }

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn page(words: &[&str]) -> OcrPage {
        let n = words.len();
        OcrPage::from_parallel(
            words.iter().map(|w| w.to_string()).collect(),
            vec![1; n],
            vec![1; n],
            vec![1; n],
        )
        .unwrap()
    }

    fn processor(
        english: &[&str],
        danish: &[&str],
        common: &[&str],
        lemmatizer: Arc<dyn Lemmatizer>,
        translator: Arc<Echo>,
        options: PipelineOptions,
    ) -> PageProcessor {
        let resources = LanguageResources::from_sets(
            set(english),
            set(danish),
            set(common),
            Language::Danish,
        )
        .unwrap();
        let segmenter: DictSegmenter = [("你好".to_string(), 10u64)].into_iter().collect();
        let resolver = TranslationResolver::new(
            ResolverConfig::default(),
            Arc::new(NoArticles),
            translator,
        );
        PageProcessor::new(
            Arc::new(resources),
            lemmatizer,
            Arc::new(segmenter),
            Arc::new(resolver),
            options,
        )
    }

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_danish_page_keeps_all_listed_tokens() {
        let lemmatizer: LookupLemmatizer =
            [("går".to_string(), "gå".to_string())].into_iter().collect();
        let processor = processor(
            &[],
            &["hund", "hus", "gå", "går"],
            &[],
            Arc::new(lemmatizer),
            Arc::new(Echo::default()),
            PipelineOptions::default(),
        );

        let analysis = processor.analyze(&page(&["hund", "hus", "går"]));

        assert_eq!(analysis.tally.danish, 3);
        assert_eq!(analysis.language, Language::Danish);
        assert_eq!(analysis.candidates, vec!["hund", "hus", "går"]);
    }

    #[test]
    fn test_page_without_votes_keeps_everything() {
        let processor = processor(
            &["the"],
            &["og"],
            &[],
            Arc::new(IdentityLemmatizer),
            Arc::new(Echo::default()),
            PipelineOptions::default(),
        );

        let analysis = processor.analyze(&page(&["qwx", "??", "zz"]));

        assert!(analysis.tally.is_empty());
        assert_eq!(analysis.language, Language::Unknown);
        assert_eq!(analysis.candidates, vec!["qwx", "zz"]);
    }

    #[test]
    fn test_chinese_lines_are_resegmented() {
        let processor = processor(
            &[],
            &[],
            &[],
            Arc::new(IdentityLemmatizer),
            Arc::new(Echo::default()),
            PipelineOptions::default(),
        );

        let analysis = processor.analyze(&page(&["你好世界"]));

        assert_eq!(analysis.language, Language::Chinese);
        assert_eq!(analysis.candidates, vec!["你好", "世", "界"]);
    }

    #[tokio::test]
    async fn test_process_gates_resolves_and_deduplicates() {
        let pool = test_pool().await;
        let translator = Arc::new(Echo::default());
        let processor = processor(
            &["the"],
            &["hund", "hus", "og", "bil"],
            &["og", "hus"],
            Arc::new(IdentityLemmatizer),
            translator.clone(),
            PipelineOptions {
                skip_common: true,
                fast_mode: true,
            },
        );
        let scan = page(&["Hunden", "hund", "og", "hus", "bil", "hund"]);

        let report = processor.process(&pool, "B", 3, &scan).await.unwrap();

        assert_eq!(report.language, Some(Language::Danish));
        // "Hunden" is not in the list, so the filter already drops it
        assert_eq!(report.candidates, 5);
        assert_eq!(report.foreign, 1);
        assert_eq!(report.known, 1);
        assert_eq!(report.stored, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 2);

        let again = processor.process(&pool, "B", 3, &scan).await.unwrap();
        assert_eq!(again.stored, 0);
        assert_eq!(again.duplicates, 3);

        let repo = VocabRepository::new(&pool);
        assert_eq!(repo.count_for_book("B").await.unwrap(), 2);
        let hund = repo.get("hund", "B", 3).await.unwrap().unwrap();
        assert_eq!(hund.definition, "en:hund");
        assert_eq!(hund.source_tier, "raw_translation");
    }

    #[tokio::test]
    async fn test_common_words_resolved_when_not_skipped() {
        let pool = test_pool().await;
        let processor = processor(
            &[],
            &["hus", "og"],
            &["hus"],
            Arc::new(IdentityLemmatizer),
            Arc::new(Echo::default()),
            PipelineOptions {
                skip_common: false,
                fast_mode: true,
            },
        );

        let report = processor.process(&pool, "B", 1, &page(&["hus"])).await.unwrap();

        assert_eq!(report.known, 0);
        assert_eq!(report.stored, 1);
    }
}
