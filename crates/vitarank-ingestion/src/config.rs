//! Ingestor configuration.

use serde::{Deserialize, Serialize};

/// Tunables for discovery and ingestion.
///
/// The two pool widths bound the independent parallelism levels: how many
/// files a batch processes at once, and how many pages a single document
/// extracts at once. Peak memory follows from their product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestorConfig {
    /// Files larger than this are rejected at discovery and ingest.
    pub max_file_size: u64,
    /// Simultaneous files during batch ingestion.
    pub file_workers: usize,
    /// Simultaneous page-extraction tasks per document.
    pub page_workers: usize,
    /// Extensions (lowercase, no dot) considered PDF-like during discovery.
    pub pdf_extensions: Vec<String>,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024,
            file_workers: 4,
            page_workers: 4,
            pdf_extensions: vec!["pdf".to_string()],
        }
    }
}

impl IngestorConfig {
    /// Parse a config from TOML, filling unset fields with defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
