//! Dictionary extract tier
//!
//! Fetches the introductory plain-text extract of a word's article from a
//! MediaWiki site (Wiktionary by default).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::LookupError;
use crate::language::Language;

/// Online dictionary returning article extracts
#[async_trait]
pub trait DictionaryService: Send + Sync {
    /// Introductory extract for `word`; `Ok(None)` when there is no article
    async fn extract(&self, word: &str) -> Result<Option<String>, LookupError>;
}

/// MediaWiki `prop=extracts` client
pub struct WiktionaryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl WiktionaryClient {
    /// `endpoint` may contain `{lang}`, replaced by the source language code
    pub fn new(
        endpoint: &str,
        language: Language,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.replace("{lang}", language.code()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DictionaryService for WiktionaryClient {
    async fn extract(&self, word: &str) -> Result<Option<String>, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", word),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Response(format!(
                "dictionary service returned {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        Ok(parse_extract(&body))
    }
}

/// Pull the first page's extract out of a MediaWiki query response
pub fn parse_extract(body: &Value) -> Option<String> {
    let pages = body.get("query")?.get("pages")?.as_object()?;
    let extract = pages.values().next()?.get("extract")?.as_str()?.trim();

    if extract.is_empty() {
        None
    } else {
        Some(extract.to_string())
    }
}
