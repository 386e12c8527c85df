use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::extraction::ocr::OcrScope;

/// Application configuration loaded from environment variables.
/// Every key has a default; a value that is set but unparsable fails start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub resume_folder: PathBuf,
    pub output_json: PathBuf,
    pub output_csv: PathBuf,
    pub output_xlsx: PathBuf,
    /// Reference keyword file; built-in lists are used when unset.
    pub reference_file: Option<PathBuf>,
    pub tesseract_cmd: String,
    pub pdftoppm_cmd: String,
    pub ocr_lang: String,
    pub ocr_dpi: u32,
    pub ocr_scope: OcrScope,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            resume_folder: var("RESUME_FOLDER", "resumes").into(),
            output_json: var("OUTPUT_JSON", "all_resumes_text.json").into(),
            output_csv: var("OUTPUT_CSV", "resume_analysis.csv").into(),
            output_xlsx: var("OUTPUT_XLSX", "resume_analysis.xlsx").into(),
            reference_file: lookup("REFERENCE_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            tesseract_cmd: var("TESSERACT_CMD", "tesseract"),
            pdftoppm_cmd: var("PDFTOPPM_CMD", "pdftoppm"),
            ocr_lang: var("OCR_LANG", "eng"),
            ocr_dpi: var("OCR_DPI", "200")
                .parse::<u32>()
                .context("OCR_DPI must be a positive integer")?,
            ocr_scope: var("OCR_SCOPE", "document")
                .parse::<OcrScope>()
                .context("OCR_SCOPE is invalid")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
