//! Whole-book runs
//!
//! A book is a folder of page images under the books directory. Pages are
//! processed one after another; a page that cannot be recognized is logged
//! and skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;

use super::page::{PageProcessor, PageReport};
use crate::error::{AppError, Result};
use crate::ocr::OcrService;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A page image and the page number taken from its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    pub number: u32,
}

/// A page that was skipped
#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    pub page_number: u32,
    pub file: String,
    pub reason: String,
}

/// Summary of a book run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookReport {
    pub book: String,
    pub pages: Vec<PageReport>,
    pub failures: Vec<PageFailure>,
}

impl BookReport {
    /// Words newly stored over the whole run
    pub fn stored(&self) -> usize {
        self.pages.iter().map(|p| p.stored).sum()
    }
}

/// Runs the page pipeline over every page of a book
pub struct BookRunner {
    books_dir: PathBuf,
    ocr: OcrService,
    processor: Arc<PageProcessor>,
    pool: SqlitePool,
}

impl BookRunner {
    pub fn new(
        books_dir: impl Into<PathBuf>,
        ocr: OcrService,
        processor: Arc<PageProcessor>,
        pool: SqlitePool,
    ) -> Self {
        Self {
            books_dir: books_dir.into(),
            ocr,
            processor,
            pool,
        }
    }

    /// Process every page of `book` in page-file order
    pub async fn run(&self, book: &str) -> Result<BookReport> {
        let folder = self.books_dir.join(book);
        let pages = collect_pages(&folder)?;

        tracing::info!(
            book,
            pages = pages.len(),
            engine = self.ocr.engine_name(),
            fast = self.processor.options().fast_mode,
            "Starting book scan"
        );

        let mut report = BookReport {
            book: book.to_string(),
            ..Default::default()
        };

        for page in &pages {
            let file = page.path.display().to_string();

            let ocr = match self.ocr.recognize_page(&page.path).await {
                Ok(ocr) => ocr,
                Err(e) => {
                    tracing::warn!(book, page = page.number, "OCR failed, skipping page: {}", e);
                    report.failures.push(PageFailure {
                        page_number: page.number,
                        file,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.processor.process(&self.pool, book, page.number, &ocr).await {
                Ok(page_report) => report.pages.push(page_report),
                Err(e) if e.is_blocking() => return Err(e),
                Err(e) => {
                    tracing::warn!(book, page = page.number, "Page failed: {}", e);
                    report.failures.push(PageFailure {
                        page_number: page.number,
                        file,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            book,
            processed = report.pages.len(),
            failed = report.failures.len(),
            stored = report.stored(),
            "Book scan finished"
        );
        Ok(report)
    }
}

/// Page images of a book folder, sorted by file name
pub fn collect_pages(folder: &Path) -> Result<Vec<PageFile>> {
    if !folder.is_dir() {
        return Err(AppError::NotFound(format!(
            "Book folder not found: {}",
            folder.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_page_image(path))
        .collect();
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for path in files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match page_number(&stem) {
            Some(number) => pages.push(PageFile { path, number }),
            None => tracing::warn!(file = %path.display(), "No page number in file name, skipping"),
        }
    }

    Ok(pages)
}

fn is_page_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Last run of ASCII digits in a file stem
pub fn page_number(stem: &str) -> Option<u32> {
    let end = stem.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = stem[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    stem[start..end].parse().ok()
}
