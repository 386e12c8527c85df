//! Extractor: turns a resume file into normalized lowercase text.
//!
//! Strategy is picked by extension (case-insensitive):
//! - `.pdf`  → per-page text layer, OCR fallback for pages without one
//! - `.docx` → body paragraphs
//! - images  → OCR on the whole image
//!
//! `Extractor::extract` never returns an error. Unsupported files and failed
//! extractions come back as `ExtractOutcome` variants whose text is empty, so
//! a bad file drops out of the batch instead of stopping it.

pub(crate) mod docx;
pub mod ocr;
pub(crate) mod pdf;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};

use crate::extraction::ocr::{OcrEngine, OcrError, OcrScope, PageRenderer};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Image,
    /// Lowercased extension, empty when the file has none.
    Unsupported(String),
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            ext if IMAGE_EXTENSIONS.contains(&ext) => Self::Image,
            _ => Self::Unsupported(extension),
        }
    }
}

/// Resume text after trimming and lowercasing. Keyword matching relies on
/// the lowercasing happening here, once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// What happened to one file.
#[derive(Debug)]
pub enum ExtractOutcome {
    Extracted(ExtractedText),
    Unsupported { extension: String },
    Failed { reason: String },
}

impl ExtractOutcome {
    /// Extracted text, or empty text for skipped and failed files.
    #[cfg(test)]
    pub fn into_text(self) -> ExtractedText {
        match self {
            Self::Extracted(text) => text,
            Self::Unsupported { .. } | Self::Failed { .. } => ExtractedText::default(),
        }
    }
}

pub struct Extractor {
    ocr: Arc<dyn OcrEngine>,
    renderer: Arc<dyn PageRenderer>,
    scope: OcrScope,
}

impl Extractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, renderer: Arc<dyn PageRenderer>, scope: OcrScope) -> Self {
        Self {
            ocr,
            renderer,
            scope,
        }
    }

    pub async fn extract(&self, path: &Path) -> ExtractOutcome {
        let raw = match FileKind::from_path(path) {
            FileKind::Pdf => {
                pdf::extract(path, self.ocr.as_ref(), self.renderer.as_ref(), self.scope).await
            }
            FileKind::Docx => docx::extract(path).await,
            FileKind::Image => self.extract_image(path).await,
            FileKind::Unsupported(extension) => {
                warn!("Skipping unsupported file: {}", path.display());
                return ExtractOutcome::Unsupported { extension };
            }
        };

        match raw {
            Ok(raw) => ExtractOutcome::Extracted(ExtractedText::normalize(&raw)),
            Err(e) => {
                error!("Error processing {}: {e}", path.display());
                ExtractOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn extract_image(&self, path: &Path) -> Result<String, ExtractError> {
        let mut text = self.ocr.image_to_string(path).await?;
        text.push('\n');
        Ok(text)
    }
}
