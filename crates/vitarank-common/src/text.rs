//! Text normalization shared by page extraction and keyterm scoring.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // Everything that is not a word character, whitespace, or hyphen.
    static ref NON_TERM: Regex = Regex::new(r"[^\w\s-]").unwrap();
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Drop control and other non-printable characters, keeping whitespace.
pub fn strip_non_printable(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Per-page cleanup applied after extraction: strip non-printables,
/// then collapse whitespace and trim.
pub fn normalize_page_text(text: &str) -> String {
    collapse_whitespace(&strip_non_printable(text))
}

/// Scoring preprocess: lowercase, strip punctuation except hyphens
/// that sit inside a term, collapse whitespace.
pub fn preprocess_for_scoring(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_TERM.replace_all(&lowered, " ");
    // Hyphens survive only between word characters ("full-stack" stays,
    // a dangling "- " or " -" does not).
    let mut cleaned = String::with_capacity(stripped.len());
    let chars: Vec<char> = stripped.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            let prev_ok = i > 0 && chars[i - 1].is_alphanumeric();
            let next_ok = i + 1 < chars.len() && chars[i + 1].is_alphanumeric();
            cleaned.push(if prev_ok && next_ok { '-' } else { ' ' });
        } else {
            cleaned.push(c);
        }
    }
    collapse_whitespace(&cleaned)
}
