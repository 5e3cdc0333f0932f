//! lopdf-backed page text and metadata extraction.

use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use lopdf::{Document, Object};

use vitarank_common::document::DocumentMetadata;
use vitarank_common::text::normalize_page_text;

/// Open the PDF container. Failure here is fatal for the file.
pub fn open_container(path: &Path) -> Result<Document, lopdf::Error> {
    Document::load(path)
}

/// Extract and normalize the text of one logical page.
///
/// Pure computation over the already-loaded container; safe to run from
/// any worker. Errors are reported to the caller, which decides whether
/// to absorb them.
pub fn extract_page_text(doc: &Document, page_number: u32) -> anyhow::Result<String> {
    let raw = doc
        .extract_text(&[page_number])
        .with_context(|| format!("page {page_number}"))?;
    Ok(normalize_page_text(&raw))
}

/// Read container-level metadata from the trailer's Info dictionary.
/// Absent fields default to None; a missing Info dictionary is normal.
pub fn extract_metadata(
    doc: &Document,
    filename: &str,
    file_size: u64,
    checksum: String,
) -> DocumentMetadata {
    DocumentMetadata {
        filename: filename.to_string(),
        page_count: doc.get_pages().len(),
        file_size,
        author: info_string(doc, b"Author"),
        title: info_string(doc, b"Title"),
        subject: info_string(doc, b"Subject"),
        creator: info_string(doc, b"Creator"),
        creation_date: info_string(doc, b"CreationDate").and_then(|s| parse_pdf_date(&s)),
        checksum,
    }
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let info = match info {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let dict = info.as_dict().ok()?;
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = decode_pdf_string(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// PDF text strings are UTF-16BE when prefixed with a BOM, otherwise
/// treated as Latin-ish bytes.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Parse a PDF date of the form `D:YYYYMMDDHHmmSS...`, tolerating the
/// date-only short form. Timezone suffixes are ignored.
pub fn parse_pdf_date(raw: &str) -> Option<NaiveDateTime> {
    let digits: String = raw
        .trim_start_matches("D:")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.len() >= 14 {
        NaiveDateTime::parse_from_str(&digits[..14], "%Y%m%d%H%M%S").ok()
    } else if digits.len() >= 8 {
        NaiveDate::parse_from_str(&digits[..8], "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_pdf_date() {
        let parsed = parse_pdf_date("D:20240131093015+02'00'").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-31 09:30:15");
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_pdf_date("D:20231105").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-11-05 00:00:00");
    }

    #[test]
    fn test_parse_garbage_date() {
        assert!(parse_pdf_date("last tuesday").is_none());
        assert!(parse_pdf_date("D:2024").is_none());
    }

    #[test]
    fn test_decode_utf16_string() {
        // "Hi" as UTF-16BE with BOM.
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
    }

    #[test]
    fn test_decode_plain_string() {
        assert_eq!(decode_pdf_string(b"Jane Doe"), "Jane Doe");
    }
}
