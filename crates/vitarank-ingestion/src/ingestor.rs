//! Concurrent, fault-tolerant PDF ingestion.
//!
//! Two independently bounded parallelism levels:
//!   - file level: `batch_ingest` runs up to `file_workers` documents at once
//!   - page level: `ingest` extracts up to `page_workers` pages at once
//!
//! Page extraction tasks are pure computations over the loaded container;
//! the only shared state per file is the result collector owned by the
//! ingest call. Reassembly sorts by page number, so pool completion order
//! is never observable in the output.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lopdf::Document;
use serde::Serialize;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vitarank_common::document::{DocumentBundle, Page};

use crate::checksum::sha256_file;
use crate::config::IngestorConfig;
use crate::discover;
use crate::error::IngestError;
use crate::pdf;

// ── Progress events ───────────────────────────────────────────────────────────

/// Progress event emitted during batch ingestion (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct IngestProgress {
    pub job_id: Uuid,
    pub stage: String,
    pub path: Option<String>,
    pub completed: usize,
    pub total: usize,
    pub error: Option<String>,
}

// ── Cancellation ──────────────────────────────────────────────────────────────

/// Cooperative cancellation flag, checked at file-loop granularity.
/// In-flight files drain; files never started report `Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Batch outcome ─────────────────────────────────────────────────────────────

/// One status entry per discovered path, in discovery order.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<DocumentBundle, IngestError>,
}

// ── Ingestor ──────────────────────────────────────────────────────────────────

/// Turns filesystem paths or directories into validated [`DocumentBundle`]s,
/// tolerating partial failure.
#[derive(Debug, Clone, Default)]
pub struct PdfIngestor {
    config: IngestorConfig,
}

impl PdfIngestor {
    pub fn new(config: IngestorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestorConfig {
        &self.config
    }

    /// Enumerate valid PDF candidates under `dir` in stable lexical order.
    /// Invalid files are logged and skipped; only a missing directory fails.
    pub async fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
        let dir = dir.to_path_buf();
        let config = self.config.clone();
        run_blocking(move || discover::discover(&dir, &config)).await?
    }

    /// Ingest a single document: validate, hash, open the container, extract
    /// pages on the bounded page pool, and reassemble in page order.
    ///
    /// Individual page failures are absorbed; the call fails only when the
    /// container cannot be opened or every page fails.
    pub async fn ingest(&self, path: &Path) -> Result<DocumentBundle, IngestError> {
        let owned = path.to_path_buf();
        let config = self.config.clone();

        // Validation, hashing, and container open are blocking I/O.
        let (doc, file_size, checksum) = run_blocking(move || {
            discover::validate(&owned, &config)?;
            let file_size = std::fs::metadata(&owned)?.len();
            let checksum = sha256_file(&owned)?;
            let doc = pdf::open_container(&owned)?;
            Ok::<_, IngestError>((doc, file_size, checksum))
        })
        .await??;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let doc = Arc::new(doc);
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let page_count = page_numbers.len();

        let collected = self.extract_pages(Arc::clone(&doc), &page_numbers).await;
        if collected.is_empty() && page_count > 0 {
            return Err(IngestError::ExtractionFailed(path.to_path_buf()));
        }

        let metadata = pdf::extract_metadata(&doc, &filename, file_size, checksum);
        let pages = assemble_pages(collected, &filename);
        info!(
            path = %path.display(),
            pages = pages.len(),
            reported = page_count,
            "document ingested"
        );

        DocumentBundle::new(metadata, pages)
            .map_err(|e| IngestError::Io(std::io::Error::other(e)))
    }

    /// Fan page extraction out over the bounded page pool and collect the
    /// survivors. Failed pages are logged and excluded.
    async fn extract_pages(&self, doc: Arc<Document>, page_numbers: &[u32]) -> Vec<(u32, String)> {
        let semaphore = Arc::new(Semaphore::new(self.config.page_workers.max(1)));
        let mut tasks: JoinSet<(u32, anyhow::Result<String>)> = JoinSet::new();

        for &page_number in page_numbers {
            let doc = Arc::clone(&doc);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = run_blocking(move || pdf::extract_page_text(&doc, page_number))
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|r| r);
                (page_number, result)
            });
        }

        let mut collected = Vec::with_capacity(page_numbers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page_number, Ok(content))) => {
                    debug!(page = page_number, chars = content.len(), "page extracted");
                    collected.push((page_number, content));
                }
                Ok((page_number, Err(e))) => {
                    warn!(page = page_number, error = %e, "page extraction failed");
                }
                Err(e) => warn!(error = %e, "page task aborted"),
            }
        }
        collected
    }

    /// Ingest every PDF-like file under `dir`.
    ///
    /// Returns exactly one outcome per enumerated path, materialized in the
    /// stable enumeration order. Files that fail validation (bad header,
    /// oversize) appear as typed failures rather than being dropped. One
    /// file's failure never aborts the others; only a missing directory
    /// fails the batch.
    pub async fn batch_ingest(&self, dir: &Path) -> Result<Vec<FileOutcome>, IngestError> {
        self.batch_ingest_with_events(dir, None, None).await
    }

    /// `batch_ingest` with optional progress broadcasting and cooperative
    /// cancellation. Cancellation is checked between files: in-flight files
    /// drain, unstarted files report [`IngestError::Cancelled`].
    pub async fn batch_ingest_with_events(
        &self,
        dir: &Path,
        progress: Option<broadcast::Sender<IngestProgress>>,
        cancel: Option<CancelFlag>,
    ) -> Result<Vec<FileOutcome>, IngestError> {
        let paths = {
            let dir = dir.to_path_buf();
            let config = self.config.clone();
            run_blocking(move || discover::candidates(&dir, &config)).await??
        };
        let total = paths.len();
        let job_id = Uuid::new_v4();
        info!(job_id = %job_id, dir = %dir.display(), total, "batch ingestion started");

        let emit = |stage: &str, path: Option<&Path>, completed: usize, error: Option<String>| {
            if let Some(tx) = &progress {
                let _ = tx.send(IngestProgress {
                    job_id,
                    stage: stage.to_string(),
                    path: path.map(|p| p.display().to_string()),
                    completed,
                    total,
                    error,
                });
            }
        };
        emit("discovered", None, 0, None);

        let is_cancelled = || cancel.as_ref().is_some_and(CancelFlag::is_cancelled);
        let semaphore = Arc::new(Semaphore::new(self.config.file_workers.max(1)));
        let mut tasks: JoinSet<(usize, Result<DocumentBundle, IngestError>)> = JoinSet::new();
        let mut results: Vec<Option<Result<DocumentBundle, IngestError>>> =
            (0..total).map(|_| None).collect();

        for (index, path) in paths.iter().enumerate() {
            if is_cancelled() {
                results[index] = Some(Err(IngestError::Cancelled));
                continue;
            }
            // Waiting for a slot bounds the spawn loop itself, which keeps
            // the cancellation check meaningful under load.
            let permit = Arc::clone(&semaphore).acquire_owned().await.ok();
            if is_cancelled() {
                results[index] = Some(Err(IngestError::Cancelled));
                continue;
            }

            let ingestor = self.clone();
            let path = path.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let result = ingestor.ingest(&path).await;
                (index, result)
            });
        }

        let mut completed = total - tasks.len();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    completed += 1;
                    let error = result.as_ref().err().map(|e| e.to_string());
                    emit("file", Some(paths[index].as_path()), completed, error);
                    results[index] = Some(result);
                }
                Err(e) => {
                    completed += 1;
                    warn!(error = %e, "ingest task aborted");
                }
            }
        }

        let outcomes: Vec<FileOutcome> = paths
            .into_iter()
            .zip(results)
            .map(|(path, result)| FileOutcome {
                path,
                result: result.unwrap_or_else(|| {
                    Err(IngestError::Io(std::io::Error::other("ingest task aborted")))
                }),
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(job_id = %job_id, total, succeeded, "batch ingestion complete");
        emit("complete", None, total, None);
        Ok(outcomes)
    }
}

/// Sort collected page results into ordered [`Page`]s. Completion order of
/// the pool never reaches the bundle.
fn assemble_pages(collected: Vec<(u32, String)>, source_file: &str) -> Vec<Page> {
    let mut pages: Vec<Page> = collected
        .into_iter()
        .map(|(page_number, content)| Page {
            page_number,
            content,
            source_file: source_file.to_string(),
        })
        .collect();
    pages.sort_by_key(|p| p.page_number);
    pages
}

async fn run_blocking<T, F>(f: F) -> Result<T, IngestError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| IngestError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitarank_common::document::join_pages;

    #[test]
    fn test_assemble_pages_is_completion_order_independent() {
        let in_order = vec![(1, "one".to_string()), (2, "two".to_string()), (3, "three".to_string())];
        let permuted = vec![(3, "three".to_string()), (1, "one".to_string()), (2, "two".to_string())];

        let a = assemble_pages(in_order, "cv.pdf");
        let b = assemble_pages(permuted, "cv.pdf");

        let numbers: Vec<u32> = a.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(join_pages(&a), join_pages(&b));
    }

    #[test]
    fn test_assemble_pages_with_gap() {
        // Page 2 failed upstream and was excluded.
        let pages = assemble_pages(vec![(3, "three".to_string()), (1, "one".to_string())], "cv.pdf");
        let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(join_pages(&pages), "one\n\nthree");
    }

    #[test]
    fn test_cancel_flag() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        let observer = flag.clone();
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
