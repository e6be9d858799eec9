//! Vocabulary Scanner Library
//!
//! Harvests study-language vocabulary from scanned book pages.
//!
//! # Modules
//!
//! - `ocr`: OCR engine adapter and token normalization
//! - `language`: frequency lists, lemmas, segmentation and language voting
//! - `resolver`: tiered definition lookup with caching
//! - `pipeline`: page and book processing
//! - `db`: vocabulary persistence
//! - `report`: deduplicated report rows and export

pub mod config;
pub mod db;
pub mod error;
pub mod language;
pub mod ocr;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod state;
