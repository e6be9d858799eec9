//! Machine translation
//!
//! Failures are returned as [`TranslateError`] values; whether to embed
//! them in output is up to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::TranslateError;
use crate::language::Language;

/// Longest text sent in one request
const MAX_QUERY_CHARS: usize = 4500;

/// Machine translation service
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslateError>;
}

/// Google Translate `client=gtx` endpoint
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;
        parse_gtx_response(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslateError> {
        let (sl, tl) = (service_code(source), service_code(target));
        let mut parts = Vec::new();
        for chunk in split_chunks(text, MAX_QUERY_CHARS) {
            parts.push(self.translate_chunk(&chunk, sl, tl).await?);
        }

        let translated = parts.join("\n");
        if translated.trim().is_empty() {
            return Err(TranslateError::Empty);
        }
        Ok(translated)
    }
}

/// Language code understood by the service
fn service_code(language: Language) -> &'static str {
    match language {
        Language::English => "en",
        Language::Danish => "da",
        Language::Chinese => "zh-CN",
        Language::Unknown => "auto",
    }
}

/// Concatenate the translated segments of a gtx response
pub fn parse_gtx_response(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing sentence array".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        Err(TranslateError::Empty)
    } else {
        Ok(text)
    }
}

/// Split text into pieces of at most `max` characters, on line breaks where
/// possible
fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if current_len > 0 && current_len + 1 + line_len > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if current_len > 0 || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_gtx_response_joins_segments() {
        let body = json!([
            [["Dog. ", "Hund. ", null, null, 10], ["A pet.", "Et kæledyr.", null, null, 3]],
            null,
            "da"
        ]);
        assert_eq!(parse_gtx_response(&body).unwrap(), "Dog. A pet.");
    }

    #[test]
    fn test_parse_gtx_response_errors() {
        assert!(matches!(
            parse_gtx_response(&json!({"error": "quota"})),
            Err(TranslateError::Malformed(_))
        ));
        assert_eq!(parse_gtx_response(&json!([[]])), Err(TranslateError::Empty));
    }

    #[test]
    fn test_split_chunks_on_lines() {
        let text = "aaaa\nbbbb\ncc";
        assert_eq!(split_chunks(text, 9), vec!["aaaa\nbbbb", "cc"]);
        assert_eq!(split_chunks(text, 100), vec![text]);
        assert_eq!(split_chunks("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(split_chunks("", 3), vec![""]);
    }

    #[test]
    fn test_service_codes() {
        assert_eq!(service_code(Language::Danish), "da");
        assert_eq!(service_code(Language::Chinese), "zh-CN");
    }
}
