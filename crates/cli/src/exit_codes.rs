//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Description                                        |
//! |------|----------------------------------------------------|
//! | 0    | Success - the two exports reconcile cleanly        |
//! | 1    | Differences found (divergent or missing records)   |
//! | 2    | CLI usage error (bad args, invalid options file)   |
//! | 5    | Input file cannot be read or parsed                |
//! | 6    | Report export failed                               |
//! | 7    | Duplicate sale numbers (only with `--strict`)      |

/// Success - command completed and the exports reconcile cleanly.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found (outside tolerance, or records missing on one side).
/// Like `diff(1)`, exit 1 means "the sides differ."
pub const EXIT_DIFFS: u8 = 1;

/// Usage error - bad arguments or an invalid options file.
pub const EXIT_USAGE: u8 = 2;

/// Input read failure - a source file cannot be opened or parsed.
pub const EXIT_READ: u8 = 5;

/// Export failure - the report workbook could not be written.
pub const EXIT_EXPORT: u8 = 6;

/// Duplicate sale numbers found within one source (`--strict` only).
pub const EXIT_DUPLICATE: u8 = 7;
