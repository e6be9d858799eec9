//! Word resolution
//!
//! Turns a candidate word into a reader-facing definition, trying a lexical
//! database, an online dictionary extract and plain machine translation in
//! that order.

mod cache;
mod lexicon;
mod service;
mod translate;
mod types;
mod wiktionary;

pub use cache::{CacheStats, LookupCache, DEFAULT_CAPACITY};
pub use lexicon::{LexicalDatabase, LexiconSource, WnLmfFile, WordNet};
pub use service::{ResolverConfig, TranslationResolver};
pub use translate::{parse_gtx_response, GoogleTranslateClient, Translator};
pub use types::{LookupError, Resolution, ResolvedDefinition, Sense, SourceTier, TranslateError};
pub use wiktionary::{parse_extract, DictionaryService, WiktionaryClient};
