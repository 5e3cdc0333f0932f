use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for PDF ingestion.
///
/// Per-page extraction failures do not appear here: they are absorbed and
/// logged, and only surface as `ExtractionFailed` when every page of a
/// document fails.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("file exceeds size limit: {size} bytes (limit {limit})")]
    OversizedFile { size: u64, limit: u64 },

    #[error("missing %PDF- header: {0}")]
    InvalidHeader(PathBuf),

    #[error("failed to open PDF container: {0}")]
    ContainerOpenFailure(#[from] lopdf::Error),

    #[error("text extraction failed on every page of {0}")]
    ExtractionFailed(PathBuf),

    #[error("batch cancelled before this file was processed")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
