use std::fmt;
use std::path::PathBuf;

/// File-level failures. These are the only user-visible errors the system
/// produces — cell-level problems degrade to absent values inside the
/// engine.
#[derive(Debug)]
pub enum IoError {
    /// The input file cannot be opened or parsed at all.
    Read { path: PathBuf, message: String },
    /// The workbook opened but contains no sheets.
    EmptyWorkbook { path: PathBuf },
    /// The report writer could not be constructed or saved. No partial
    /// artifact is offered.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::EmptyWorkbook { path } => {
                write!(f, "{} contains no sheets", path.display())
            }
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}
