//! Error types for the vocabulary scanner

use thiserror::Error;

use crate::language::ResourceError;
use crate::ocr::OcrError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Language resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether this error must stop a whole book run rather than a single page
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::Config(_) | AppError::Database(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_classification() {
        assert!(AppError::NotFound("book/missing".into()).is_blocking());
        assert!(!AppError::Ocr(OcrError::ProcessingError("bad scan".into())).is_blocking());
    }
}
