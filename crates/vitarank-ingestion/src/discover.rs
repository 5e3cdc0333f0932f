//! Candidate discovery and file validation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::IngestorConfig;
use crate::error::IngestError;

/// Magic bytes every PDF must start with.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Recursively enumerate files under `dir` carrying a configured PDF
/// extension, sorted by full path so enumeration order is stable across
/// runs and platforms. No content validation happens here; batch ingestion
/// uses this so invalid files still get a typed status entry.
pub fn candidates(dir: &Path, config: &IngestorConfig) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut found = Vec::new();
    walk(dir, config, &mut found)?;
    found.sort();
    Ok(found)
}

/// Recursively enumerate valid PDF candidates under `dir`.
///
/// A candidate must carry a configured extension, start with `%PDF-`, and
/// stay under the size ceiling. Files failing a content check are logged
/// and skipped, never raised. Order is the stable lexical order of
/// [`candidates`].
pub fn discover(dir: &Path, config: &IngestorConfig) -> Result<Vec<PathBuf>, IngestError> {
    let found: Vec<PathBuf> = candidates(dir, config)?
        .into_iter()
        .filter(|path| match validate(path, config) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping invalid candidate");
                false
            }
        })
        .collect();
    debug!(dir = %dir.display(), n = found.len(), "discovery complete");
    Ok(found)
}

fn walk(dir: &Path, config: &IngestorConfig, found: &mut Vec<PathBuf>) -> Result<(), IngestError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, config, found)?;
        } else if has_pdf_extension(&path, config) {
            found.push(path);
        }
    }
    Ok(())
}

fn has_pdf_extension(path: &Path, config: &IngestorConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            config.pdf_extensions.iter().any(|known| known == &e)
        })
        .unwrap_or(false)
}

/// Check existence, size ceiling, and the `%PDF-` header for one file.
/// Shared by discovery (skip on failure) and ingest (typed failure).
pub fn validate(path: &Path, config: &IngestorConfig) -> Result<(), IngestError> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_size {
        return Err(IngestError::OversizedFile { size, limit: config.max_file_size });
    }

    let mut header = [0u8; 5];
    let n = File::open(path)?.read(&mut header)?;
    if n < PDF_MAGIC.len() || &header[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(IngestError::InvalidHeader(path.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let err = discover(Path::new("/no/such/dir"), &IngestorConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_non_pdf_header_excluded() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "real.pdf", b"%PDF-1.4 rest");
        write_file(dir.path(), "fake.pdf", b"PK\x03\x04 zip bytes");

        let found = discover(dir.path(), &IngestorConfig::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("real.pdf"));
    }

    #[test]
    fn test_candidates_keep_invalid_files_for_batch_status() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "real.pdf", b"%PDF-1.4 rest");
        write_file(dir.path(), "fake.pdf", b"PK\x03\x04 zip bytes");

        let all = candidates(dir.path(), &IngestorConfig::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_oversized_file_excluded() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "big.pdf", b"%PDF-1.4 0123456789");

        let config = IngestorConfig { max_file_size: 8, ..Default::default() };
        let found = discover(dir.path(), &config).unwrap();
        assert!(found.is_empty());

        let err = validate(&dir.path().join("big.pdf"), &config).unwrap_err();
        assert!(matches!(err, IngestError::OversizedFile { limit: 8, .. }));
    }

    #[test]
    fn test_discovery_order_is_lexical_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(dir.path(), "b.pdf", b"%PDF-1.4");
        write_file(dir.path(), "a.pdf", b"%PDF-1.4");
        write_file(&dir.path().join("sub"), "c.pdf", b"%PDF-1.4");

        let found = discover(dir.path(), &IngestorConfig::default()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "sub/c.pdf"]);
    }

    #[test]
    fn test_extension_filter_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "upper.PDF", b"%PDF-1.7");
        write_file(dir.path(), "notes.txt", b"%PDF-1.7");

        let found = discover(dir.path(), &IngestorConfig::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("upper.PDF"));
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate(Path::new("/no/such.pdf"), &IngestorConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}
