// Excel file import (xlsx, xls, xlsb, ods)
//
// One-way conversion: the chosen sheet becomes a Table, first row as column
// labels. Cell-level oddities degrade to empty or text; only file-level
// problems are errors.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use ledgermatch_recon::table::{Cell, Table};

use crate::error::IoError;

/// Read one sheet of an Excel file into a Table.
///
/// Sheet selection: the first `preferred_sheets` name present wins, else the
/// first sheet in the workbook. The first row of the used range supplies the
/// column labels (numeric label cells render like a spreadsheet shows them).
pub fn read_table(path: &Path, preferred_sheets: &[String]) -> Result<Table, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        message: format!("failed to open Excel file: {e}"),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IoError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    }

    let chosen = preferred_sheets
        .iter()
        .find(|p| sheet_names.iter().any(|n| n == *p))
        .cloned()
        .unwrap_or_else(|| sheet_names[0].clone());

    let range = workbook.worksheet_range(&chosen).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        message: format!("failed to read sheet '{chosen}': {e}"),
    })?;

    let mut rows = range.rows();
    let labels: Vec<String> = rows
        .next()
        .map(|row| {
            row.iter()
                .map(|cell| to_cell(cell).display_text().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let mut table = Table::new(chosen, labels);
    for row in rows {
        table.push_row(row.iter().map(to_cell).collect());
    }
    Ok(table)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Store the error marker as text so it surfaces in raw output
        Data::Error(e) => Cell::Text(format!("#{e:?}")),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::DateTime(naive),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
