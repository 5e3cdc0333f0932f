//! Data models shared between ingestion and scoring.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::VitarankError;

/// Separator placed between page contents when deriving `full_text`.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Container-level metadata for one ingested document.
/// Immutable once produced by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    #[serde(rename = "num_pages")]
    pub page_count: usize,
    pub file_size: u64,
    pub author: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub creation_date: Option<NaiveDateTime>,
    /// Hex-encoded SHA-256 digest of the raw file bytes.
    pub checksum: String,
}

/// One logical page of extracted, normalized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number, unique within a bundle.
    pub page_number: u32,
    pub content: String,
    pub source_file: String,
}

/// The normalized in-memory representation of an ingested document:
/// metadata, pages sorted ascending by page number, and their joined text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBundle {
    pub metadata: DocumentMetadata,
    pub pages: Vec<Page>,
    pub full_text: String,
}

impl DocumentBundle {
    /// Build a bundle from collected pages. Pages are sorted ascending by
    /// page number here, so task completion order upstream never matters.
    ///
    /// Fails when a page number repeats or when more pages were collected
    /// than the container reported.
    pub fn new(metadata: DocumentMetadata, mut pages: Vec<Page>) -> crate::Result<Self> {
        pages.sort_by_key(|p| p.page_number);

        if pages.windows(2).any(|w| w[0].page_number == w[1].page_number) {
            return Err(VitarankError::InvalidDocument(format!(
                "duplicate page number in {}",
                metadata.filename
            )));
        }
        if pages.len() > metadata.page_count {
            return Err(VitarankError::InvalidDocument(format!(
                "{} pages collected but container reports {}",
                pages.len(),
                metadata.page_count
            )));
        }

        let full_text = join_pages(&pages);
        Ok(Self { metadata, pages, full_text })
    }
}

/// Derive the joined document text from ordered pages.
/// Pure function of the page sequence.
pub fn join_pages(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// A candidate term with its per-algorithm scores and fused ranking value.
///
/// `per_algorithm_scores` holds an entry for every registered algorithm
/// (0.0 when the algorithm did not emit the term). A BTreeMap keeps
/// iteration and serialization order deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeytermCandidate {
    pub term: String,
    pub per_algorithm_scores: BTreeMap<String, f64>,
    pub domain_relevance: f64,
    pub composite_score: f64,
}
