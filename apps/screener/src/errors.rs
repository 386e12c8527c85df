use std::path::PathBuf;

use thiserror::Error;

use crate::models::ReferenceError;
use crate::output::OutputError;

/// Run-level errors. Per-file extraction problems never reach this type;
/// they are absorbed by the extractor.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No resumes found in {}", .0.display())]
    NoResumes(PathBuf),

    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
