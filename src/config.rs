//! Configuration management for the vocabulary scanner

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::language::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub paths: PathConfig,
    pub database: DatabaseConfig,
    pub language: LanguageConfig,
    pub scan: ScanConfig,
    pub services: ServiceConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    /// One sub-folder of page images per book
    pub books_dir: PathBuf,
    /// Exported reports
    pub words_dir: PathBuf,
    /// `<code>.txt` ranked word lists
    pub frequency_dir: PathBuf,
    pub lemma_table: Option<PathBuf>,
    pub segment_dict: Option<PathBuf>,
    /// WN-LMF lexicon, plain or gzip
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    pub study: Language,
    pub native: Language,
    pub membership_size: usize,
    pub common_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub skip_common: bool,
    pub fast_mode: bool,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// MediaWiki API; `{lang}` is replaced by the study language code
    pub wiktionary_endpoint: String,
    pub translate_endpoint: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub tesseract_bin: String,
    pub languages: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathConfig {
                books_dir: PathBuf::from("./book"),
                words_dir: PathBuf::from("./word"),
                frequency_dir: PathBuf::from("./data/frequency"),
                lemma_table: None,
                segment_dict: None,
                lexicon_path: None,
            },
            database: DatabaseConfig {
                url: "sqlite:./word/vocab.db".to_string(),
            },
            language: LanguageConfig {
                study: Language::Danish,
                native: Language::English,
                membership_size: 30_000,
                common_size: 500,
            },
            scan: ScanConfig {
                skip_common: true,
                fast_mode: false,
                cache_capacity: 256,
            },
            services: ServiceConfig {
                wiktionary_endpoint: "https://{lang}.wiktionary.org/w/api.php".to_string(),
                translate_endpoint: "https://translate.googleapis.com/translate_a/single"
                    .to_string(),
                user_agent: concat!("vocab-scanner/", env!("CARGO_PKG_VERSION")).to_string(),
                http_timeout_secs: 5,
            },
            ocr: OcrConfig {
                tesseract_bin: "tesseract".to_string(),
                languages: "eng+dan".to_string(),
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            paths: PathConfig {
                books_dir: env_path("BOOKS_DIR").unwrap_or(defaults.paths.books_dir),
                words_dir: env_path("WORDS_DIR").unwrap_or(defaults.paths.words_dir),
                frequency_dir: env_path("FREQUENCY_DIR").unwrap_or(defaults.paths.frequency_dir),
                lemma_table: env_path("LEMMA_TABLE"),
                segment_dict: env_path("SEGMENT_DICT"),
                lexicon_path: env_path("LEXICON_PATH"),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            language: LanguageConfig {
                study: env_parse("STUDY_LANGUAGE")?.unwrap_or(defaults.language.study),
                native: env_parse("NATIVE_LANGUAGE")?.unwrap_or(defaults.language.native),
                membership_size: env_parse("MEMBERSHIP_SIZE")?
                    .unwrap_or(defaults.language.membership_size),
                common_size: env_parse("COMMON_SIZE")?.unwrap_or(defaults.language.common_size),
            },
            scan: ScanConfig {
                skip_common: env_parse("SKIP_COMMON")?.unwrap_or(defaults.scan.skip_common),
                fast_mode: env_parse("FAST_MODE")?.unwrap_or(defaults.scan.fast_mode),
                cache_capacity: env_parse("CACHE_CAPACITY")?
                    .unwrap_or(defaults.scan.cache_capacity),
            },
            services: ServiceConfig {
                wiktionary_endpoint: env::var("WIKTIONARY_ENDPOINT")
                    .unwrap_or(defaults.services.wiktionary_endpoint),
                translate_endpoint: env::var("TRANSLATE_ENDPOINT")
                    .unwrap_or(defaults.services.translate_endpoint),
                user_agent: env::var("USER_AGENT").unwrap_or(defaults.services.user_agent),
                http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS")?
                    .unwrap_or(defaults.services.http_timeout_secs),
            },
            ocr: OcrConfig {
                tesseract_bin: env::var("TESSERACT_BIN").unwrap_or(defaults.ocr.tesseract_bin),
                languages: env::var("OCR_LANGUAGES").unwrap_or(defaults.ocr.languages),
            },
        })
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}

/// Parse an optional variable; a present but invalid value is an error
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", key, raw, e))),
        _ => Ok(None),
    }
}
