//! vitarank-ingestion — Concurrent PDF ingestion.
//! - Candidate discovery with header/size validation
//! - Streamed SHA-256 checksums
//! - Bounded parallel page extraction with deterministic reassembly
//! - Batch ingestion with per-file status, progress events, cancellation

pub mod checksum;
pub mod config;
pub mod discover;
pub mod error;
pub mod ingestor;
pub mod pdf;

pub use config::IngestorConfig;
pub use error::IngestError;
pub use ingestor::{CancelFlag, FileOutcome, IngestProgress, PdfIngestor};
