//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};
use crate::language::{
    DictSegmenter, IdentityLemmatizer, LanguageResources, Lemmatizer, LookupLemmatizer, Segmenter,
    WordListDirectory,
};
use crate::ocr::{OcrService, TesseractProvider};
use crate::pipeline::{BookRunner, PageProcessor, PipelineOptions};
use crate::resolver::{
    GoogleTranslateClient, ResolverConfig, TranslationResolver, WiktionaryClient, WnLmfFile,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    resources: Arc<LanguageResources>,
    lemmatizer: Arc<dyn Lemmatizer>,
    segmenter: Arc<dyn Segmenter>,
    resolver: Arc<TranslationResolver>,
    ocr: OcrService,
}

impl AppState {
    /// Open the database and load every language resource and client
    pub async fn new(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.paths.words_dir)?;
        let db = db::create_pool(&config.database.url).await?;

        let provider = WordListDirectory::new(&config.paths.frequency_dir);
        let resources = LanguageResources::load(
            &provider,
            config.language.study,
            config.language.membership_size,
            config.language.common_size,
        )?;
        tracing::info!(
            study = %config.language.study,
            common = resources.common().len(),
            "Frequency lists loaded"
        );

        let lemmatizer: Arc<dyn Lemmatizer> = match &config.paths.lemma_table {
            Some(path) => Arc::new(LookupLemmatizer::from_path(path)?),
            None => {
                tracing::info!("No lemma table configured, using surface forms");
                Arc::new(IdentityLemmatizer)
            }
        };

        let segmenter: Arc<dyn Segmenter> = match &config.paths.segment_dict {
            Some(path) => Arc::new(DictSegmenter::from_path(path)?),
            None => Arc::new(DictSegmenter::default()),
        };

        let resolver = Arc::new(Self::build_resolver(&config)?);

        let ocr = OcrService::new(Arc::new(TesseractProvider::new(
            &config.ocr.tesseract_bin,
            &config.ocr.languages,
        )));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                resources: Arc::new(resources),
                lemmatizer,
                segmenter,
                resolver,
                ocr,
            }),
        })
    }

    fn build_resolver(config: &Config) -> Result<TranslationResolver> {
        let services = &config.services;

        let dictionary = WiktionaryClient::new(
            &services.wiktionary_endpoint,
            config.language.study,
            &services.user_agent,
            services.timeout(),
        )
        .map_err(|e| AppError::Config(format!("dictionary client: {}", e)))?;

        let translator = GoogleTranslateClient::new(
            &services.translate_endpoint,
            &services.user_agent,
            services.timeout(),
        )
        .map_err(|e| AppError::Config(format!("translation client: {}", e)))?;

        let resolver = TranslationResolver::new(
            ResolverConfig {
                source: config.language.study,
                target: config.language.native,
                cache_capacity: config.scan.cache_capacity,
            },
            Arc::new(dictionary),
            Arc::new(translator),
        );

        Ok(match &config.paths.lexicon_path {
            Some(path) => resolver.with_lexicon(Arc::new(WnLmfFile::new(path))),
            None => resolver,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub fn resolver(&self) -> &Arc<TranslationResolver> {
        &self.inner.resolver
    }

    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Page processor sharing this state's resources
    pub fn page_processor(&self, options: PipelineOptions) -> PageProcessor {
        PageProcessor::new(
            self.inner.resources.clone(),
            self.inner.lemmatizer.clone(),
            self.inner.segmenter.clone(),
            self.inner.resolver.clone(),
            options,
        )
    }

    pub fn book_runner(&self, options: PipelineOptions) -> BookRunner {
        BookRunner::new(
            &self.inner.config.paths.books_dir,
            self.inner.ocr.clone(),
            Arc::new(self.page_processor(options)),
            self.inner.db.clone(),
        )
    }
}
