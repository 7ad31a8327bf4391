//! `lmatch inspect` — show what the loaders would make of a file before
//! running a reconciliation: chosen sheet, column mapping, salesperson
//! headers, and how many rows carry a sale number.

use std::path::PathBuf;

use ledgermatch_recon::normalize::{
    self, canonical_movement_field, canonical_sales_field,
};

use crate::{load_options, CliError};

pub fn cmd_inspect(
    file: PathBuf,
    as_sales: bool,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let options = load_options(config.as_deref(), None)?;

    let table = ledgermatch_io::read_table(&file, &options.preferred_sheets)
        .map_err(|e| CliError::read(e.to_string()))?;

    println!(
        "sheet: {} ({} rows, {} columns)",
        table.name,
        table.row_count(),
        table.labels.len(),
    );

    let payment = |label: &str| {
        options
            .payment_columns
            .iter()
            .any(|p| label.trim().eq_ignore_ascii_case(p))
    };

    println!("columns:");
    for label in &table.labels {
        let canonical = if as_sales {
            canonical_sales_field(label)
        } else {
            canonical_movement_field(label)
        };
        match canonical {
            Some(field) => println!("  {label} -> {field}"),
            None if !as_sales && payment(label) => println!("  {label} -> payment method"),
            None => println!("  {label} (unmapped)"),
        }
    }

    if as_sales {
        let records = normalize::normalize_sales(&table);
        let keyed = records.iter().filter(|r| r.sale_number.is_some()).count();
        println!("rows with a sale number: {keyed} of {}", records.len());
    } else {
        let records = normalize::normalize_movement(&table);
        let keyed = records.iter().filter(|r| r.sale_number.is_some()).count();
        println!("rows with a sale number: {keyed} of {}", records.len());

        let mut headers: Vec<&str> = Vec::new();
        for record in &records {
            if let Some(header) = record.vendor_header.as_deref() {
                if !headers.contains(&header) {
                    headers.push(header);
                }
            }
        }
        if headers.is_empty() {
            println!("no salesperson headers detected");
        } else {
            println!("salesperson headers:");
            for header in headers {
                println!("  {header}");
            }
        }
    }

    Ok(())
}
