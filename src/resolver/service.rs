//! Translation fallback resolver
//!
//! Resolves a word to reader-facing text through an ordered chain:
//! lexical database senses, then a dictionary article extract, then a plain
//! machine translation of the word. The first productive tier wins.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::cache::{CacheStats, LookupCache, DEFAULT_CAPACITY};
use super::lexicon::{LexicalDatabase, LexiconSource};
use super::translate::Translator;
use super::types::{Resolution, SourceTier};
use super::wiktionary::DictionaryService;
use crate::language::Language;

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Language of the words being resolved
    pub source: Language,
    /// Language definitions are translated into
    pub target: Language,
    /// Words kept per cached tier
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source: Language::Danish,
            target: Language::English,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Word resolver owning its caches and lexicon load state
pub struct TranslationResolver {
    config: ResolverConfig,
    lexicon_source: Option<Arc<dyn LexiconSource>>,
    /// Set once; `None` inside means the load failed and the tier is off
    lexicon: OnceCell<Option<Box<dyn LexicalDatabase>>>,
    dictionary: Arc<dyn DictionaryService>,
    translator: Arc<dyn Translator>,
    lexicon_cache: LookupCache<Vec<String>>,
    extract_cache: LookupCache<Option<String>>,
}

impl TranslationResolver {
    pub fn new(
        config: ResolverConfig,
        dictionary: Arc<dyn DictionaryService>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let capacity = config.cache_capacity;
        Self {
            config,
            lexicon_source: None,
            lexicon: OnceCell::new(),
            dictionary,
            translator,
            lexicon_cache: LookupCache::new(capacity),
            extract_cache: LookupCache::new(capacity),
        }
    }

    /// Enable the lexical database tier
    pub fn with_lexicon(mut self, source: Arc<dyn LexiconSource>) -> Self {
        self.lexicon_source = Some(source);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a word. `fast` skips the lexical database tier.
    pub async fn resolve(&self, word: &str, fast: bool) -> Resolution {
        if !fast {
            let entries = self.lexicon_entries(word).await;
            if !entries.is_empty() {
                tracing::debug!(word, senses = entries.len(), "Resolved from lexicon");
                return Resolution {
                    extract: None,
                    display: entries.join("\n"),
                    tier: SourceTier::Lexicon,
                };
            }
        }

        if let Some(extract) = self.dictionary_extract(word).await {
            tracing::debug!(word, "Resolved from dictionary extract");
            let display = self.translate_or_placeholder(&extract).await;
            return Resolution {
                extract: Some(extract),
                display,
                tier: SourceTier::DictionaryExtract,
            };
        }

        tracing::debug!(word, "Falling back to raw translation");
        Resolution {
            extract: None,
            display: self.translate_or_placeholder(word).await,
            tier: SourceTier::RawTranslation,
        }
    }

    /// Enumerated, translated sense glosses (cached)
    async fn lexicon_entries(&self, word: &str) -> Vec<String> {
        if let Some(cached) = self.lexicon_cache.get(word) {
            return cached;
        }

        let Some(lexicon) = self.lexicon().await else {
            return Vec::new();
        };

        let senses = lexicon.senses(word, self.config.source);
        let mut entries = Vec::with_capacity(senses.len());
        for (i, sense) in senses.iter().enumerate() {
            let translated = self.translate_or_placeholder(&sense.gloss).await;
            entries.push(format!("{}: {}", i, translated));
        }

        self.lexicon_cache.put(word, entries.clone());
        entries
    }

    /// Loaded lexical database, loading it on first use
    async fn lexicon(&self) -> Option<&dyn LexicalDatabase> {
        let source = self.lexicon_source.as_ref()?;
        self.lexicon
            .get_or_init(|| async {
                match source.load().await {
                    Ok(db) => Some(db),
                    Err(e) => {
                        tracing::warn!("Lexical database unavailable, tier disabled: {}", e);
                        None
                    }
                }
            })
            .await
            .as_deref()
    }

    /// Dictionary article extract (cached; lookup failures are not cached)
    async fn dictionary_extract(&self, word: &str) -> Option<String> {
        if let Some(cached) = self.extract_cache.get(word) {
            return cached;
        }

        match self.dictionary.extract(word).await {
            Ok(extract) => {
                self.extract_cache.put(word, extract.clone());
                extract
            }
            Err(e) => {
                tracing::warn!(word, "Dictionary lookup failed: {}", e);
                None
            }
        }
    }

    async fn translate_or_placeholder(&self, text: &str) -> String {
        match self
            .translator
            .translate(text, self.config.source, self.config.target)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("Translation failed: {}", e);
                e.placeholder()
            }
        }
    }

    /// Statistics of the (lexicon, dictionary extract) caches
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.lexicon_cache.stats(), self.extract_cache.stats())
    }
}
