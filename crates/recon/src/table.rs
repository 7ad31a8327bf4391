use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A raw cell value as read from one sheet of one source file.
///
/// The loaders map spreadsheet cells onto this shape; the engine never sees
/// the file format. Unparseable content stays `Text` — downstream coercion is
/// fail-soft and resolves to absent, never to an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The text a spreadsheet user would see, or `None` for empty cells.
    /// Floats with no fractional part render without a trailing `.0` so that
    /// key extraction sees `501`, not `501.0`.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Numeric view of the cell. Text is parsed with `.` as the decimal
    /// separator, falling back to the decimal-comma convention; anything
    /// that does not parse is absent.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => coerce_number(s),
            _ => None,
        }
    }

    /// Timestamp view of the cell. Native datetime cells pass through; text
    /// is tried against the timestamp shapes both exports produce. Failed
    /// parses are absent, not errors.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => Some(*dt),
            Cell::Text(s) => parse_datetime_text(s.trim()),
            _ => None,
        }
    }
}

/// Basic numeric coercion for text cells: plain `12.5` first, then the
/// decimal-comma convention where `.` is a thousands separator — `1.234,56`
/// is 1234.56.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse() {
        return Some(n);
    }
    if trimmed.contains(',') {
        let cleaned: String = trimmed
            .chars()
            .filter(|c| *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        return cleaned.parse().ok();
    }
    None
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    const STAMP_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

    for fmt in STAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One sheet's worth of data: ordered column labels plus rows of cells.
///
/// No fixed schema — column presence varies by export, and rows may be
/// ragged. Out-of-range lookups read as empty.
#[derive(Debug, Clone)]
pub struct Table {
    /// Sheet name (or file stem for CSV inputs).
    pub name: String,
    pub labels: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            labels,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// First column whose label matches any alias, case-insensitively after
    /// trimming. Missing columns are simply `None` — never an error.
    pub fn column_matching(&self, aliases: &[&str]) -> Option<usize> {
        self.labels.iter().position(|label| {
            let label = label.trim();
            aliases.iter().any(|a| label.eq_ignore_ascii_case(a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_renders_integral_floats_without_decimals() {
        assert_eq!(Cell::Number(501.0).display_text().as_deref(), Some("501"));
        assert_eq!(Cell::Number(12.5).display_text().as_deref(), Some("12.5"));
        assert_eq!(Cell::Empty.display_text(), None);
        assert_eq!(Cell::Text(String::new()).display_text(), None);
    }

    #[test]
    fn as_number_is_fail_soft() {
        assert_eq!(Cell::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(Cell::Text("100,00".into()).as_number(), Some(100.0));
        assert_eq!(Cell::Text("abc".into()).as_number(), None);
        assert_eq!(Cell::Number(3.0).as_number(), Some(3.0));
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn coerce_number_handles_thousands_dots() {
        assert_eq!(coerce_number("1.234,56"), Some(1234.56));
        assert_eq!(coerce_number("123.45"), Some(123.45));
        assert_eq!(coerce_number("-"), None);
    }

    #[test]
    fn as_datetime_tries_both_date_orders() {
        let dt = Cell::Text("2026-03-14 09:30:00".into()).as_datetime();
        assert_eq!(dt.map(|d| d.format("%H").to_string()).as_deref(), Some("09"));

        let br = Cell::Text("14/03/2026 09:30".into()).as_datetime();
        assert_eq!(br.map(|d| d.format("%d").to_string()).as_deref(), Some("14"));

        assert_eq!(Cell::Text("not a time".into()).as_datetime(), None);
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let mut t = Table::new("t", vec!["a".into(), "b".into()]);
        t.push_row(vec![Cell::Text("x".into())]);
        assert_eq!(t.cell(0, 1), &Cell::Empty);
        assert_eq!(t.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn column_matching_is_case_insensitive() {
        let t = Table::new("t", vec![" Valor do Documento ".into(), "Data".into()]);
        assert_eq!(t.column_matching(&["valor do documento"]), Some(0));
        assert_eq!(t.column_matching(&["DATA"]), Some(1));
        assert_eq!(t.column_matching(&["Cliente"]), None);
    }
}
