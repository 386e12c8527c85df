//! OCR backends. Both are black boxes behind traits so the extractor can be
//! exercised without the external binaries installed.
//!
//! Defaults shell out to `tesseract` (image → text) and `pdftoppm` from
//! poppler-utils (PDF page → PNG).

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::str::FromStr;

use async_trait::async_trait;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("'{command}' rendered no pages from {path}")]
    NoPages { command: String, path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which pages of a PDF get OCR'd when a page has no text layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OcrScope {
    /// Every page without text appends OCR output for the whole document.
    #[default]
    Document,
    /// Only the page without text is rendered and recognized.
    EmptyPages,
}

#[derive(Debug, Error)]
#[error("unknown OCR scope '{0}' (expected 'document' or 'empty_pages')")]
pub struct ParseOcrScopeError(String);

impl FromStr for OcrScope {
    type Err = ParseOcrScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "empty_pages" | "empty-pages" => Ok(Self::EmptyPages),
            other => Err(ParseOcrScopeError(other.to_string())),
        }
    }
}

/// Turns an image into text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn image_to_string(&self, image: &Path) -> Result<String, OcrError>;
}

/// Renders PDF pages to image files.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders all pages when `page` is `None`, otherwise only that
    /// (1-based) page.
    async fn render(&self, pdf: &Path, page: Option<u32>) -> Result<RenderedPages, OcrError>;
}

/// Page images in page order. The backing directory is removed on drop.
#[derive(Debug)]
pub struct RenderedPages {
    _dir: TempDir,
    pages: Vec<PathBuf>,
}

impl RenderedPages {
    pub fn new(dir: TempDir, pages: Vec<PathBuf>) -> Self {
        Self { _dir: dir, pages }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.pages
    }
}

pub struct Tesseract {
    command: String,
    lang: String,
}

impl Tesseract {
    pub fn new(command: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for Tesseract {
    async fn image_to_string(&self, image: &Path) -> Result<String, OcrError> {
        debug!("{} {} stdout -l {}", self.command, image.display(), self.lang);

        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .await
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub struct Pdftoppm {
    command: String,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(command: impl Into<String>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PageRenderer for Pdftoppm {
    async fn render(&self, pdf: &Path, page: Option<u32>) -> Result<RenderedPages, OcrError> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");

        let mut command = Command::new(&self.command);
        command.arg("-png").arg("-r").arg(self.dpi.to_string());
        if let Some(page) = page {
            command
                .arg("-f")
                .arg(page.to_string())
                .arg("-l")
                .arg(page.to_string());
        }
        command.arg(pdf).arg(&prefix);
        debug!(pdf = %pdf.display(), ?page, dpi = self.dpi, "rendering PDF pages");

        let output = command.output().await.map_err(|source| OcrError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pages = collect_page_images(dir.path())?;
        if pages.is_empty() {
            return Err(OcrError::NoPages {
                command: self.command.clone(),
                path: pdf.display().to_string(),
            });
        }

        Ok(RenderedPages::new(dir, pages))
    }
}

/// pdftoppm zero-pads page numbers to a common width, so name order is page order.
fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    pages.sort();
    Ok(pages)
}
