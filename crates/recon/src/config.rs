use serde::Deserialize;

use crate::error::ReconError;

/// Default divergence tolerance in currency units.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Run options. Every field has a default matching the daily-close exports
/// this engine was built for, so an empty TOML document (or no document at
/// all) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconOptions {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Sheet names tried in order; falls back to the first sheet present.
    #[serde(default = "default_preferred_sheets")]
    pub preferred_sheets: Vec<String>,
    /// Payment-method column allow-list, matched case-insensitively.
    #[serde(default = "default_payment_columns")]
    pub payment_columns: Vec<String>,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            preferred_sheets: default_preferred_sheets(),
            payment_columns: default_payment_columns(),
        }
    }
}

impl ReconOptions {
    pub fn from_toml(s: &str) -> Result<Self, ReconError> {
        let options: Self =
            toml::from_str(s).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

pub fn default_preferred_sheets() -> Vec<String> {
    ["MovimentoDiario", "Movimento Diário", "Planilha1", "Sheet1"]
        .map(String::from)
        .to_vec()
}

pub fn default_payment_columns() -> Vec<String> {
    [
        "dinheiro",
        "cartão",
        "cartao",
        "pix",
        "ch.vista",
        "ch.prazo",
        "crediário",
        "crediario",
        "convênio",
        "convenio",
        "outras moedas",
    ]
    .map(String::from)
    .to_vec()
}
