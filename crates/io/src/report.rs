// Report export
//
// Packages the four reconciliation views into one workbook. Pure
// serialization: the sheets mirror the in-memory views column for column,
// no business logic. Any writer failure aborts the whole save — no partial
// artifact.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use ledgermatch_recon::model::{Divergence, ReconResult, ReconciledPair};

use crate::error::IoError;

const PAIR_COLUMNS: &[&str] = &[
    "NumeroVenda",
    "doc",
    "emitido_em",
    "cliente_ven",
    "valor_ven",
    "origem",
    "status",
    "hora",
    "doc_emp",
    "valor_doc",
    "data_mov",
    "serie",
    "cliente_mov",
    "vendedor_codigo",
    "vendedor_nome",
];

const DIVERGENCE_COLUMNS: &[&str] = &[
    "NumeroVenda",
    "valor_ven",
    "valor_doc",
    "Diferenca",
    "vendedor_codigo",
    "vendedor_nome",
];

/// Write the four-sheet report: full reconciliation, both missing
/// partitions, divergences.
pub fn write_report(path: &Path, result: &ReconResult) -> Result<(), IoError> {
    build_workbook(result)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| IoError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn build_workbook(result: &ReconResult) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_pairs_sheet(&mut workbook, "ConferenciaGeral", &result.pairs, &header)?;
    write_pairs_sheet(
        &mut workbook,
        "FaltandoNoMovimento",
        &result.missing_in_movement,
        &header,
    )?;
    write_pairs_sheet(
        &mut workbook,
        "FaltandoEmMinhasVendas",
        &result.missing_in_sales,
        &header,
    )?;
    write_divergences_sheet(&mut workbook, "Divergencias", &result.divergences.rows, &header)?;
    Ok(workbook)
}

fn write_pairs_sheet(
    workbook: &mut Workbook,
    name: &str,
    pairs: &[ReconciledPair],
    header: &Format,
) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet().set_name(name)?;
    write_header_row(worksheet, PAIR_COLUMNS, header)?;

    for (i, pair) in pairs.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, pair.sale_number as f64)?;

        if let Some(sales) = &pair.sales {
            write_opt_string(worksheet, row, 1, sales.doc_ref.as_deref())?;
            let issued = sales
                .issued_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
            write_opt_string(worksheet, row, 2, issued.as_deref())?;
            write_opt_string(worksheet, row, 3, sales.client.as_deref())?;
            write_opt_number(worksheet, row, 4, sales.value)?;
            write_opt_string(worksheet, row, 5, sales.origin.as_deref())?;
            write_opt_string(worksheet, row, 6, sales.status.as_deref())?;
            write_opt_number(worksheet, row, 7, sales.hour.map(f64::from))?;
        }

        if let Some(movement) = &pair.movement {
            write_opt_string(worksheet, row, 8, movement.doc_ref.as_deref())?;
            write_opt_number(worksheet, row, 9, movement.doc_value)?;
            write_opt_string(worksheet, row, 10, movement.date.as_deref())?;
            write_opt_string(worksheet, row, 11, movement.series.as_deref())?;
            write_opt_string(worksheet, row, 12, movement.client.as_deref())?;
            write_opt_string(worksheet, row, 13, movement.vendor_code.as_deref())?;
            write_opt_string(worksheet, row, 14, movement.vendor_name.as_deref())?;
        }
    }
    Ok(())
}

fn write_divergences_sheet(
    workbook: &mut Workbook,
    name: &str,
    rows: &[Divergence],
    header: &Format,
) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet().set_name(name)?;
    write_header_row(worksheet, DIVERGENCE_COLUMNS, header)?;

    for (i, d) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, d.sale_number as f64)?;
        worksheet.write_number(row, 1, d.sales_value)?;
        worksheet.write_number(row, 2, d.movement_value)?;
        worksheet.write_number(row, 3, d.difference)?;
        write_opt_string(worksheet, row, 4, d.vendor_code.as_deref())?;
        write_opt_string(worksheet, row, 5, d.vendor_name.as_deref())?;
    }
    Ok(())
}

fn write_header_row(
    worksheet: &mut Worksheet,
    columns: &[&str],
    header: &Format,
) -> Result<(), XlsxError> {
    for (col, label) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *label, header)?;
    }
    Ok(())
}

fn write_opt_string(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<(), XlsxError> {
    if let Some(v) = value {
        worksheet.write_string(row, col, v)?;
    }
    Ok(())
}

fn write_opt_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), XlsxError> {
    if let Some(v) = value {
        worksheet.write_number(row, col, v)?;
    }
    Ok(())
}
