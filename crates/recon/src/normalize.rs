//! Column normalization for both sources.
//!
//! Renaming is an explicit alias map applied defensively: each canonical
//! field looks up its known source labels, case-insensitively; absent columns
//! leave the field absent. Normalization never drops rows — rows without a
//! sale number are excluded from the join later but stay available to
//! callers.

use std::collections::HashMap;

use chrono::Timelike;

use crate::extract;
use crate::model::{MovementRecord, SalesRecord};
use crate::table::Table;
use crate::vendor;

// ---------------------------------------------------------------------------
// Alias maps
// ---------------------------------------------------------------------------

pub const MOVEMENT_DOC_REF: &[&str] = &["Doc/Emp"];
pub const MOVEMENT_DOC_VALUE: &[&str] = &["Valor do Documento"];
pub const MOVEMENT_DATE: &[&str] = &["Data"];
pub const MOVEMENT_SERIES: &[&str] = &["Série", "Serie"];
pub const MOVEMENT_CLIENT: &[&str] = &["Cliente"];

pub const SALES_DOC_REF: &[&str] = &["Doc.", "Doc"];
pub const SALES_ISSUED_AT: &[&str] = &["Emitido em"];
pub const SALES_CLIENT: &[&str] = &["Cliente"];
pub const SALES_VALUE: &[&str] = &["Valor"];
pub const SALES_ORIGIN: &[&str] = &["Origem"];
pub const SALES_STATUS: &[&str] = &["Status"];

/// Canonical field a movement column label maps to, if any.
pub fn canonical_movement_field(label: &str) -> Option<&'static str> {
    let label = label.trim();
    let matches = |aliases: &[&str]| aliases.iter().any(|a| label.eq_ignore_ascii_case(a));
    if matches(MOVEMENT_DOC_REF) {
        Some("doc_ref")
    } else if matches(MOVEMENT_DOC_VALUE) {
        Some("doc_value")
    } else if matches(MOVEMENT_DATE) {
        Some("date")
    } else if matches(MOVEMENT_SERIES) {
        Some("series")
    } else if matches(MOVEMENT_CLIENT) {
        Some("client")
    } else {
        None
    }
}

/// Canonical field a sales column label maps to, if any.
pub fn canonical_sales_field(label: &str) -> Option<&'static str> {
    let label = label.trim();
    let matches = |aliases: &[&str]| aliases.iter().any(|a| label.eq_ignore_ascii_case(a));
    if matches(SALES_DOC_REF) {
        Some("doc_ref")
    } else if matches(SALES_ISSUED_AT) {
        Some("issued_at")
    } else if matches(SALES_CLIENT) {
        Some("client")
    } else if matches(SALES_VALUE) {
        Some("value")
    } else if matches(SALES_ORIGIN) {
        Some("origin")
    } else if matches(SALES_STATUS) {
        Some("status")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Normalize the movement table: rename known columns, propagate salesperson
/// context, derive the sale number from the document reference. One record
/// per input row.
pub fn normalize_movement(table: &Table) -> Vec<MovementRecord> {
    let doc_ref_col = table.column_matching(MOVEMENT_DOC_REF);
    let doc_value_col = table.column_matching(MOVEMENT_DOC_VALUE);
    let date_col = table.column_matching(MOVEMENT_DATE);
    let series_col = table.column_matching(MOVEMENT_SERIES);
    let client_col = table.column_matching(MOVEMENT_CLIENT);

    // Header markers can land in any column; fall back to the date column
    // when no column qualifies.
    let marker_col = vendor::find_marker_column(table).or(date_col);
    let contexts = vendor::propagate(table, marker_col);

    let mut records = Vec::with_capacity(table.row_count());
    for (row, ctx) in contexts.into_iter().enumerate() {
        let text_at = |col: Option<usize>| col.and_then(|c| table.cell(row, c).display_text());

        let doc_ref = text_at(doc_ref_col);
        let sale_number = doc_ref.as_deref().and_then(extract::movement_sale_number);

        let mut raw_fields = HashMap::new();
        for (col, label) in table.labels.iter().enumerate() {
            if let Some(text) = table.cell(row, col).display_text() {
                raw_fields.insert(label.clone(), text);
            }
        }

        let (vendor_code, vendor_name, vendor_header) = match ctx {
            Some(ctx) => (ctx.code, ctx.name, Some(ctx.raw)),
            None => (None, None, None),
        };

        records.push(MovementRecord {
            doc_ref,
            doc_value: doc_value_col.and_then(|c| table.cell(row, c).as_number()),
            date: text_at(date_col),
            series: text_at(series_col),
            client: text_at(client_col),
            sale_number,
            vendor_code,
            vendor_name,
            vendor_header,
            raw_fields,
        });
    }
    records
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// Normalize the sales table: rename known columns, derive the sale number
/// and, when an issue timestamp parses, hour-of-day and date. One record per
/// input row; failed timestamp parses yield absent hour/date, not an error.
pub fn normalize_sales(table: &Table) -> Vec<SalesRecord> {
    let doc_ref_col = table.column_matching(SALES_DOC_REF);
    let issued_at_col = table.column_matching(SALES_ISSUED_AT);
    let client_col = table.column_matching(SALES_CLIENT);
    let value_col = table.column_matching(SALES_VALUE);
    let origin_col = table.column_matching(SALES_ORIGIN);
    let status_col = table.column_matching(SALES_STATUS);

    let mut records = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let text_at = |col: Option<usize>| col.and_then(|c| table.cell(row, c).display_text());

        let doc_ref = text_at(doc_ref_col);
        let sale_number = doc_ref.as_deref().and_then(extract::sales_sale_number);
        let issued_at = issued_at_col.and_then(|c| table.cell(row, c).as_datetime());

        records.push(SalesRecord {
            doc_ref,
            issued_at,
            client: text_at(client_col),
            value: value_col.and_then(|c| table.cell(row, c).as_number()),
            origin: text_at(origin_col),
            status: text_at(status_col),
            sale_number,
            hour: issued_at.map(|t| t.hour()),
            date: issued_at.map(|t| t.date()),
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn movement_table() -> Table {
        let mut t = Table::new(
            "MovimentoDiario",
            vec![
                "Data".into(),
                "Doc/Emp".into(),
                "Valor do Documento".into(),
                "Série".into(),
                "Cliente".into(),
            ],
        );
        t.push_row(vec![text("Vendedor: 1 - JOAO")]);
        t.push_row(vec![
            text("2026-02-03"),
            text("DOC 501"),
            Cell::Number(100.0),
            text("A"),
            text("MARIA"),
        ]);
        t
    }

    #[test]
    fn movement_renames_and_derives() {
        let records = normalize_movement(&movement_table());
        assert_eq!(records.len(), 2);

        let header = &records[0];
        assert_eq!(header.sale_number, None);
        assert_eq!(header.vendor_name.as_deref(), Some("JOAO"));

        let row = &records[1];
        assert_eq!(row.doc_ref.as_deref(), Some("DOC 501"));
        assert_eq!(row.sale_number, Some(501));
        assert_eq!(row.doc_value, Some(100.0));
        assert_eq!(row.series.as_deref(), Some("A"));
        assert_eq!(row.client.as_deref(), Some("MARIA"));
        assert_eq!(row.vendor_code.as_deref(), Some("1"));
        assert_eq!(row.vendor_header.as_deref(), Some("Vendedor: 1 - JOAO"));
        assert_eq!(row.raw_fields.get("Doc/Emp").map(String::as_str), Some("DOC 501"));
    }

    #[test]
    fn missing_columns_leave_fields_absent() {
        let mut t = Table::new("mov", vec!["Doc/Emp".into()]);
        t.push_row(vec![text("DOC 7")]);
        let records = normalize_movement(&t);
        assert_eq!(records[0].sale_number, Some(7));
        assert_eq!(records[0].doc_value, None);
        assert_eq!(records[0].client, None);
    }

    #[test]
    fn normalization_never_drops_rows() {
        let mut t = Table::new("mov", vec!["Doc/Emp".into()]);
        t.push_row(vec![text("no digits here")]);
        t.push_row(vec![Cell::Empty]);
        let records = normalize_movement(&t);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.sale_number.is_none()));
    }

    #[test]
    fn sales_derives_hour_and_date_from_timestamp() {
        let mut t = Table::new(
            "Planilha1",
            vec!["Doc.".into(), "Emitido em".into(), "Valor".into()],
        );
        t.push_row(vec![
            text("NF-0501"),
            text("2026-02-03 14:25:00"),
            Cell::Number(100.0),
        ]);
        t.push_row(vec![text("NF-0502"), text("not a time"), Cell::Number(9.0)]);

        let records = normalize_sales(&t);
        assert_eq!(records[0].sale_number, Some(501));
        assert_eq!(records[0].hour, Some(14));
        assert_eq!(
            records[0].date.map(|d| d.to_string()).as_deref(),
            Some("2026-02-03")
        );

        // Unparseable timestamp degrades to absent, row survives.
        assert_eq!(records[1].sale_number, Some(502));
        assert_eq!(records[1].hour, None);
        assert_eq!(records[1].date, None);
    }

    #[test]
    fn sales_key_needs_nf_marker() {
        let mut t = Table::new("v", vec!["Doc.".into()]);
        t.push_row(vec![text("XX-0098")]);
        let records = normalize_sales(&t);
        assert_eq!(records[0].sale_number, None);
    }

    #[test]
    fn canonical_field_lookups() {
        assert_eq!(canonical_movement_field(" doc/emp "), Some("doc_ref"));
        assert_eq!(canonical_movement_field("Serie"), Some("series"));
        assert_eq!(canonical_movement_field("Dinheiro"), None);
        assert_eq!(canonical_sales_field("Emitido em"), Some("issued_at"));
        assert_eq!(canonical_sales_field("Valor"), Some("value"));
    }
}
