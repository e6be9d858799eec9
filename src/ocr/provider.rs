//! OCR Providers
//!
//! Defines the engine trait and the Tesseract CLI implementation.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::{OcrError, OcrPage};

/// Tesseract TSV level for word rows
const WORD_LEVEL: u32 = 5;

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging
    fn name(&self) -> &'static str;

    /// Check if the engine can be invoked
    async fn is_available(&self) -> bool;

    /// Estimate page rotation in degrees
    async fn detect_rotation(&self, image: &Path) -> Result<i32, OcrError>;

    /// Recognize an upright page image into a word table
    async fn recognize(&self, image: &Path) -> Result<OcrPage, OcrError>;
}

/// Tesseract OCR provider (CLI)
pub struct TesseractProvider {
    binary: String,
    languages: String,
    oem: u8,
    psm: u8,
}

impl TesseractProvider {
    pub fn new(binary: &str, languages: &str) -> Self {
        Self {
            binary: binary.to_string(),
            languages: languages.to_string(),
            oem: 3,
            psm: 6,
        }
    }

    async fn run(&self, args: &[&str], image: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(args)
            .output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractProvider {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn detect_rotation(&self, image: &Path) -> Result<i32, OcrError> {
        let osd = self.run(&["--psm", "0"], image).await?;
        parse_osd_rotation(&osd).ok_or(OcrError::MissingRotation)
    }

    async fn recognize(&self, image: &Path) -> Result<OcrPage, OcrError> {
        let oem = self.oem.to_string();
        let psm = self.psm.to_string();
        let tsv = self
            .run(
                &[
                    "-l",
                    self.languages.as_str(),
                    "--oem",
                    oem.as_str(),
                    "--psm",
                    psm.as_str(),
                    "tsv",
                ],
                image,
            )
            .await?;
        parse_tsv(&tsv)
    }
}

/// Extract the `Rotate:` value from Tesseract orientation output
pub fn parse_osd_rotation(osd: &str) -> Option<i32> {
    osd.lines()
        .find(|l| l.contains("Rotate:"))
        .and_then(|l| l.split(':').nth(1))
        .and_then(|v| v.trim().parse().ok())
}

/// Parse Tesseract TSV output into a word table
pub fn parse_tsv(tsv: &str) -> Result<OcrPage, OcrError> {
    let mut rows = tsv.lines();
    let header: Vec<&str> = rows
        .next()
        .ok_or_else(|| OcrError::MalformedOutput("empty TSV output".to_string()))?
        .split('\t')
        .collect();

    let column = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| OcrError::MalformedOutput(format!("missing TSV column {}", name)))
    };
    let level_col = column("level")?;
    let block_col = column("block_num")?;
    let par_col = column("par_num")?;
    let line_col = column("line_num")?;
    let text_col = column("text")?;

    let mut text = Vec::new();
    let mut blocks = Vec::new();
    let mut pars = Vec::new();
    let mut lines = Vec::new();

    for row in rows {
        if row.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = row.split('\t').collect();
        let number = |col: usize| -> Result<u32, OcrError> {
            fields
                .get(col)
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| OcrError::MalformedOutput(format!("bad TSV row: {}", row)))
        };

        if number(level_col)? != WORD_LEVEL {
            continue;
        }
        blocks.push(number(block_col)?);
        pars.push(number(par_col)?);
        lines.push(number(line_col)?);
        // trailing empty text may be cut off entirely
        text.push(fields.get(text_col).copied().unwrap_or("").to_string());
    }

    OcrPage::from_parallel(text, blocks, pars, lines)
}

/// Canned engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub page: OcrPage,
    pub rotation: Option<i32>,
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn detect_rotation(&self, _image: &Path) -> Result<i32, OcrError> {
        self.rotation.ok_or(OcrError::MissingRotation)
    }

    async fn recognize(&self, _image: &Path) -> Result<OcrPage, OcrError> {
        Ok(self.page.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t800\t1200\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t300\t20\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t96.1\tJeg
5\t1\t1\t1\t1\t2\t55\t10\t40\t20\t91.7\thar
5\t1\t1\t1\t2\t1\t10\t40\t60\t20\t88.0\thund,
5\t1\t2\t1\t1\t1\t10\t90\t20\t20\t12.0\t
";

    #[test]
    fn test_parse_tsv_keeps_word_rows() {
        let page = parse_tsv(TSV).unwrap();
        assert_eq!(page.len(), 4);

        let entries: Vec<_> = page.entries().collect();
        assert_eq!(entries[0].0, "Jeg");
        assert_eq!(entries[2].0, "hund,");
        assert_eq!(entries[2].1.line, 2);
        assert_eq!(entries[3].0, "");
        assert_eq!(entries[3].1.block, 2);
    }

    #[test]
    fn test_parse_tsv_rejects_missing_columns() {
        let result = parse_tsv("level\ttext\n5\thund\n");
        assert!(matches!(result, Err(OcrError::MalformedOutput(_))));
    }

    #[test]
    fn test_parse_osd_rotation() {
        let osd = "Page number: 0\nOrientation in degrees: 270\nRotate: 90\nOrientation confidence: 3.12\n";
        assert_eq!(parse_osd_rotation(osd), Some(90));
        assert_eq!(parse_osd_rotation("Rotate: ??"), None);
        assert_eq!(parse_osd_rotation(""), None);
    }
}
