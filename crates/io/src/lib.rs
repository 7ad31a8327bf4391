// File I/O operations

pub mod csv;
pub mod error;
pub mod report;
pub mod xlsx;

pub use error::IoError;

use std::path::Path;

use ledgermatch_recon::table::Table;

/// Read a tabular input, routing on extension: `.csv`/`.tsv` go through the
/// delimiter-sniffing CSV reader, everything else through the Excel reader.
pub fn read_table(path: &Path, preferred_sheets: &[String]) -> Result<Table, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("tsv") => csv::read_table(path),
        _ => xlsx::read_table(path, preferred_sheets),
    }
}
