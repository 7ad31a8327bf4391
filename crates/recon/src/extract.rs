//! Sale-number extraction from free-text document references.
//!
//! Both exports bury the sale number inside a reference string ("DOC 501",
//! "NF-0501"). Each side has its own pattern; both resolve unparseable input
//! to absent, never to an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::table::Cell;

/// Movement side: first maximal digit run anywhere in the text.
/// Leftmost match wins — "A12B34" extracts 12.
pub fn movement_sale_number(text: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Sales side: first digit run following the literal "NF", case-insensitive,
/// with any non-digit characters in between. Digits without a preceding "NF"
/// do not count — "XX-0098" is absent.
pub fn sales_sale_number(text: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)NF\D*(\d+)").unwrap());
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Apply an extractor to a raw cell, going through its display text so that
/// numeric cells ("501" stored as 501.0) still yield a key.
pub fn from_cell(cell: &Cell, extract: fn(&str) -> Option<u64>) -> Option<u64> {
    cell.display_text().as_deref().and_then(extract)
}
