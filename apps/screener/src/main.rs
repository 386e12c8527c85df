mod config;
mod errors;
mod extraction;
mod models;
mod output;
mod pipeline;
mod scoring;
mod state;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::ocr::{Pdftoppm, Tesseract};
use crate::extraction::Extractor;
use crate::models::ReferenceData;
use crate::scoring::Scorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on unparsable values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    let reference = load_reference(&config)?;
    let scorer = Scorer::new(reference);
    info!(
        "Scorer ready ({} course keywords)",
        scorer.total_keywords()
    );

    let extractor = Extractor::new(
        Arc::new(Tesseract::new(&config.tesseract_cmd, &config.ocr_lang)),
        Arc::new(Pdftoppm::new(&config.pdftoppm_cmd, config.ocr_dpi)),
        config.ocr_scope,
    );
    info!(
        "OCR backend: {} (lang {}), renderer: {} at {} dpi, scope {:?}",
        config.tesseract_cmd, config.ocr_lang, config.pdftoppm_cmd, config.ocr_dpi, config.ocr_scope
    );

    let state = AppState {
        config,
        extractor,
        scorer,
    };

    let report = pipeline::run_and_save(&state).await?;
    if !report.skipped.is_empty() || !report.failed.is_empty() {
        warn!(
            "{} file(s) skipped as unsupported, {} failed to extract",
            report.skipped.len(),
            report.failed.len()
        );
    }
    if report.texts.is_empty() {
        warn!("No resume produced any text; output tables are empty");
    }
    info!("{} candidate(s) scored", report.results.len());

    Ok(())
}

/// Reference keyword lists from `REFERENCE_FILE`, or the built-in lists.
fn load_reference(config: &Config) -> Result<ReferenceData, AppError> {
    match &config.reference_file {
        Some(path) => {
            let data = ReferenceData::load(path)?;
            info!(
                "Loaded {} course(s) and {} certification(s) from {}",
                data.courses.len(),
                data.certifications.len(),
                path.display()
            );
            Ok(data)
        }
        None => Ok(ReferenceData::builtin()),
    }
}
