//! OCR Service
//!
//! Orchestrates an OCR engine: detects page rotation, turns the image
//! upright and recognizes the word table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{
    provider::OcrEngine,
    types::{OcrError, OcrPage},
};

/// OCR service for scanned book pages
#[derive(Clone)]
pub struct OcrService {
    engine: Arc<dyn OcrEngine>,
}

impl OcrService {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Name of the underlying engine
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub async fn is_available(&self) -> bool {
        self.engine.is_available().await
    }

    /// Recognize a page image, rotating it upright first when needed
    pub async fn recognize_page(&self, image: &Path) -> Result<OcrPage, OcrError> {
        let rotation = match self.engine.detect_rotation(image).await {
            Ok(angle) => normalize_angle(angle),
            Err(e) => {
                tracing::debug!(image = %image.display(), "No rotation estimate ({}), assuming 0", e);
                0
            }
        };

        if rotation == 0 {
            let page = self.engine.recognize(image).await?;
            return Ok(page.with_rotation(Some(0)));
        }

        tracing::info!(image = %image.display(), rotation, "Rotating page before OCR");
        let upright = rotate_to_temp(image.to_path_buf(), rotation).await?;
        let result = self.engine.recognize(&upright).await;
        let _ = tokio::fs::remove_file(&upright).await;

        Ok(result?.with_rotation(Some(rotation)))
    }
}

/// Map any angle onto 0, 90, 180 or 270; anything else counts as upright
fn normalize_angle(angle: i32) -> i32 {
    match angle.rem_euclid(360) {
        a @ (90 | 180 | 270) => a,
        _ => 0,
    }
}

/// Rotate an image clockwise by `rotation` degrees into a temporary PNG
async fn rotate_to_temp(image: PathBuf, rotation: i32) -> Result<PathBuf, OcrError> {
    let output = std::env::temp_dir().join(format!("ocr_upright_{}.png", uuid::Uuid::new_v4()));
    let target = output.clone();

    tokio::task::spawn_blocking(move || {
        let img = image::open(&image)
            .map_err(|e| OcrError::ImageError(format!("Failed to open {}: {}", image.display(), e)))?;
        let upright = match rotation {
            90 => img.rotate90(),
            180 => img.rotate180(),
            270 => img.rotate270(),
            _ => img,
        };
        upright
            .save_with_format(&target, image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageError(format!("Failed to write rotated page: {}", e)))
    })
    .await
    .map_err(|e| OcrError::ImageError(format!("Rotation task failed: {}", e)))??;

    Ok(output)
}
