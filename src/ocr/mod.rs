//! OCR Module
//!
//! Turns scanned page images into normalized tokens.
//!
//! The engine itself is external; this module drives it, parses its word
//! table and cleans the result:
//! - `provider`: engine trait and the Tesseract CLI adapter
//! - `service`: rotation handling around an engine
//! - `normalize`: token cleanup and line grouping
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vocab_scanner::ocr::{normalize, OcrService, TesseractProvider};
//!
//! let service = OcrService::new(Arc::new(TesseractProvider::new("tesseract", "eng+dan")));
//! let page = service.recognize_page(Path::new("book/Ordbog/Ordbog_3.jpg")).await?;
//! let normalized = normalize(&page);
//! ```

mod normalize;
mod provider;
mod service;
mod types;

pub use normalize::{clean_token, normalize, NormalizedPage};
pub use provider::{parse_osd_rotation, parse_tsv, OcrEngine, TesseractProvider};
pub use service::OcrService;
pub use types::{Line, LineKey, OcrError, OcrPage, Token, TokenPosition};

#[cfg(test)]
pub use provider::MockEngine;
