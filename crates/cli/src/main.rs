// Ledgermatch CLI - headless movement vs sales reconciliation

mod exit_codes;
mod inspect;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_DIFFS, EXIT_DUPLICATE, EXIT_EXPORT, EXIT_READ, EXIT_SUCCESS, EXIT_USAGE};
use ledgermatch_recon::ReconOptions;

#[derive(Parser)]
#[command(name = "lmatch")]
#[command(about = "Reconcile a daily movement export against a sales export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the two exports and report the differences
    #[command(after_help = "\
Examples:
  lmatch run movimento.xlsx vendas.xlsx
  lmatch run movimento.xlsx vendas.xlsx --out comparativo.xlsx
  lmatch run movimento.xlsx vendas.xlsx --json | jq .summary
  lmatch run movimento.csv vendas.csv --tolerance 0.05")]
    Run {
        /// Movement export (Movimento Diário)
        movement: PathBuf,

        /// Sales export (Minhas Vendas)
        sales: PathBuf,

        /// Write the four-sheet comparison workbook here
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output JSON to stdout instead of the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Divergence tolerance in currency units (default 0.01)
        #[arg(long)]
        tolerance: Option<f64>,

        /// TOML options file (tolerance, preferred sheets, payment columns)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail when a sale number appears on multiple rows within a source
        #[arg(long)]
        strict: bool,
    },

    /// Show which sheet, columns, and salesperson headers a file yields
    #[command(after_help = "\
Examples:
  lmatch inspect movimento.xlsx
  lmatch inspect vendas.xlsx --sales")]
    Inspect {
        /// Input file (.xlsx, .xls, .ods, .csv)
        file: PathBuf,

        /// Interpret columns as the sales export (default: movement)
        #[arg(long)]
        sales: bool,

        /// TOML options file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            movement,
            sales,
            out,
            json,
            output,
            tolerance,
            config,
            strict,
        } => cmd_run(movement, sales, out, json, output, tolerance, config, strict),
        Commands::Inspect {
            file,
            sales,
            config,
        } => inspect::cmd_inspect(file, sales, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_READ,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_EXPORT,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Resolve run options: optional TOML file first, then flag overrides.
pub fn load_options(
    config: Option<&Path>,
    tolerance: Option<f64>,
) -> Result<ReconOptions, CliError> {
    let mut options = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::read(format!("cannot read {}: {e}", path.display())))?;
            ReconOptions::from_toml(&text).map_err(|e| CliError::usage(e.to_string()))?
        }
        None => ReconOptions::default(),
    };

    if let Some(tolerance) = tolerance {
        options.tolerance = tolerance;
        options
            .validate()
            .map_err(|e| CliError::usage(e.to_string()))?;
    }
    Ok(options)
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    movement_path: PathBuf,
    sales_path: PathBuf,
    out: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    tolerance: Option<f64>,
    config: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let options = load_options(config.as_deref(), tolerance)?;

    // Reconciliation needs both files; a readable one can still be looked at
    // with `lmatch inspect` while the other is fixed.
    let movement = ledgermatch_io::read_table(&movement_path, &options.preferred_sheets)
        .map_err(|e| {
            CliError::read(e.to_string()).with_hint("the sales export may still be inspectable")
        })?;
    let sales = ledgermatch_io::read_table(&sales_path, &options.preferred_sheets)
        .map_err(|e| {
            CliError::read(e.to_string()).with_hint("the movement export may still be inspectable")
        })?;

    let result = ledgermatch_recon::run(&movement, &sales, &options)
        .map_err(|e| CliError::usage(e.to_string()))?;

    if let Some(ref path) = out {
        ledgermatch_io::report::write_report(path, &result)
            .map_err(|e| CliError::export(e.to_string()))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::export(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::export(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "recon: {} sales / {} movement — {} matched, {} divergent, {} missing in movement, {} missing in sales",
        s.sales_count,
        s.movement_count,
        s.matched,
        s.divergent,
        s.missing_in_movement,
        s.missing_in_sales,
    );
    eprintln!(
        "totals: sales {:.2}, movement {:.2}, difference {:+.2}",
        s.sales_total, s.movement_total, s.total_difference,
    );
    if !s.vendors_detected.is_empty() {
        eprintln!("vendors: {}", s.vendors_detected.join(" | "));
    }
    if s.duplicate_keys > 0 {
        eprintln!(
            "warning: {} sale number(s) duplicated within a source; matches were cross-multiplied",
            s.duplicate_keys,
        );
    }

    if strict && s.duplicate_keys > 0 {
        return Err(CliError {
            code: EXIT_DUPLICATE,
            message: "duplicate sale numbers found".into(),
            hint: None,
        });
    }

    if s.divergent > 0 || s.missing_in_movement > 0 || s.missing_in_sales > 0 {
        return Err(CliError {
            code: EXIT_DIFFS,
            message: "differences found".into(),
            hint: None,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_without_a_config_file() {
        let options = load_options(None, None).unwrap();
        assert_eq!(options.tolerance, 0.01);
    }

    #[test]
    fn tolerance_flag_overrides_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        std::fs::write(&path, "tolerance = 0.5\n").unwrap();

        let options = load_options(Some(&path), Some(0.25)).unwrap();
        assert_eq!(options.tolerance, 0.25);
    }

    #[test]
    fn invalid_tolerance_flag_is_a_usage_error() {
        let err = load_options(None, Some(-1.0)).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = load_options(Some(Path::new("/nonexistent/options.toml")), None).unwrap_err();
        assert_eq!(err.code, EXIT_READ);
    }
}
