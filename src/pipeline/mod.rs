//! Page and book processing pipeline

mod book;
mod gate;
mod page;

pub use book::{collect_pages, page_number, BookReport, BookRunner, PageFailure, PageFile};
pub use gate::{CandidateWord, FrequencyGate, GateDecision};
pub use page::{PageAnalysis, PageProcessor, PageReport, PipelineOptions};
