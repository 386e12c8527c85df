//! Output artifacts: the candidate → text JSON dump and the ranked table as
//! CSV and XLSX.

pub mod json;
pub mod table;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::pipeline::ScreeningReport;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Writes every artifact named in `config`.
pub fn write_all(config: &Config, report: &ScreeningReport) -> Result<(), OutputError> {
    json::write_candidate_texts(&config.output_json, &report.texts)?;
    info!("All resumes text saved to {}", config.output_json.display());

    table::write_csv(&config.output_csv, &report.results)?;
    table::write_xlsx(&config.output_xlsx, &report.results)?;
    info!(
        "Analysis saved to {} & {}",
        config.output_csv.display(),
        config.output_xlsx.display()
    );
    Ok(())
}
