//! Salesperson context propagation.
//!
//! The movement export interleaves data rows with header rows of the form
//! `Vendedor: 36 - ANA PAULA DOS SANTOS`. A header applies to itself and to
//! every following row until the next header. The scan is a single forward
//! pass producing one derived context per row — each row's context is a pure
//! function of its position and the headers before it.

use std::sync::OnceLock;

use regex::Regex;

use crate::table::Table;

const HEADER_PREFIX: &str = "vendedor:";

/// Parsed salesperson context carried down the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorContext {
    /// Digit code, absent when the header text does not match
    /// `<code> - <name>`.
    pub code: Option<String>,
    pub name: Option<String>,
    /// The header text as written, always retained once a header is seen.
    pub raw: String,
}

/// A cell is a header iff its trimmed text starts with `Vendedor:`,
/// case-insensitive.
pub fn is_header(text: &str) -> bool {
    text.trim().to_lowercase().starts_with(HEADER_PREFIX)
}

/// Parse a header cell. Returns `None` when the text is not a header at all;
/// a header whose remainder does not match `<code> - <name>` still yields a
/// context, with code and name absent.
pub fn parse_header(text: &str) -> Option<VendorContext> {
    if !is_header(text) {
        return None;
    }
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)^Vendedor:\s*(\d+)\s*-\s*(.+)$").unwrap());

    let trimmed = text.trim();
    match re.captures(trimmed) {
        Some(caps) => Some(VendorContext {
            code: Some(caps[1].to_string()),
            name: Some(caps[2].trim().to_string()),
            raw: trimmed.to_string(),
        }),
        None => Some(VendorContext {
            code: None,
            name: None,
            raw: trimmed.to_string(),
        }),
    }
}

/// Column selection policy: scan columns in declared order and pick the first
/// in which ANY row qualifies as a header.
pub fn find_marker_column(table: &Table) -> Option<usize> {
    (0..table.labels.len()).find(|&col| {
        (0..table.row_count()).any(|row| {
            table
                .cell(row, col)
                .display_text()
                .is_some_and(|t| is_header(&t))
        })
    })
}

/// Forward-fill contexts down the sheet. Header rows capture their own parsed
/// context; other rows inherit the nearest preceding header; rows before any
/// header have none. `marker_col` of `None` means no context anywhere.
pub fn propagate(table: &Table, marker_col: Option<usize>) -> Vec<Option<VendorContext>> {
    let Some(col) = marker_col else {
        return vec![None; table.row_count()];
    };

    let mut current: Option<VendorContext> = None;
    let mut contexts = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        if let Some(text) = table.cell(row, col).display_text() {
            if let Some(ctx) = parse_header(&text) {
                current = Some(ctx);
            }
        }
        contexts.push(current.clone());
    }
    contexts
}
