use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// A normalized row from the movement (Movimento Diário) export.
///
/// Canonical fields are all optional — the loaders rename whatever known
/// columns are present and leave the rest absent. `raw_fields` keeps every
/// non-empty cell keyed by its original label for the payment-method
/// breakdown, which works off raw column names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MovementRecord {
    pub doc_ref: Option<String>,
    pub doc_value: Option<f64>,
    pub date: Option<String>,
    pub series: Option<String>,
    pub client: Option<String>,
    pub sale_number: Option<u64>,
    pub vendor_code: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_header: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub raw_fields: HashMap<String, String>,
}

/// A normalized row from the sales (Minhas Vendas) export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesRecord {
    pub doc_ref: Option<String>,
    pub issued_at: Option<NaiveDateTime>,
    pub client: Option<String>,
    pub value: Option<f64>,
    pub origin: Option<String>,
    pub status: Option<String>,
    pub sale_number: Option<u64>,
    /// Hour-of-day (0–23) derived from `issued_at`.
    pub hour: Option<u32>,
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// One row of the full outer join. At least one side is present — never both
/// absent.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledPair {
    pub sale_number: u64,
    pub sales: Option<SalesRecord>,
    pub movement: Option<MovementRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Sales,
    Movement,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Sales => "sales",
            Side::Movement => "movement",
        }
    }
}

/// A sale number appearing on more than one row within a single source.
/// Not rejected — the join cross-multiplies — but surfaced so callers can
/// warn.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateKey {
    pub side: Side,
    pub sale_number: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinOutput {
    pub pairs: Vec<ReconciledPair>,
    pub duplicates: Vec<DuplicateKey>,
}

// ---------------------------------------------------------------------------
// Divergences
// ---------------------------------------------------------------------------

/// A fully-matched pair whose values differ beyond tolerance.
#[derive(Debug, Clone, Serialize)]
pub struct Divergence {
    pub sale_number: u64,
    pub sales_value: f64,
    pub movement_value: f64,
    /// Signed: sales value − movement value.
    pub difference: f64,
    pub vendor_code: Option<String>,
    pub vendor_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DivergenceReport {
    pub rows: Vec<Divergence>,
    /// Pairs with both values present — the compared subset.
    pub compared: usize,
    /// Total signed difference over the whole compared subset, not just the
    /// divergent rows.
    pub total_difference: f64,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// One row per distinct (code, name) pair seen in movement records. Rows with
/// no salesperson context form their own group.
#[derive(Debug, Clone, Serialize)]
pub struct SalespersonSummary {
    pub code: Option<String>,
    pub name: Option<String>,
    /// Distinct sale numbers, not row count.
    pub sale_count: usize,
    pub total_value: f64,
    /// `total_value / sale_count`, absent when the group is empty.
    pub average_ticket: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyTotal {
    /// Absent hour forms its own bucket.
    pub hour: Option<u32>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientTotal {
    pub client: Option<String>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginTotal {
    pub origin: Option<String>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentTotal {
    /// Column label as it appeared in the source.
    pub method: String,
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    /// Distinct sale numbers per side.
    pub sales_count: usize,
    pub movement_count: usize,
    pub sales_total: f64,
    pub movement_total: f64,
    pub sales_average_ticket: Option<f64>,
    pub movement_average_ticket: Option<f64>,
    pub matched: usize,
    pub missing_in_movement: usize,
    pub missing_in_sales: usize,
    pub divergent: usize,
    /// Percent of compared pairs that diverge; 0 when nothing compared.
    pub divergence_rate: f64,
    pub total_difference: f64,
    pub duplicate_keys: usize,
    /// Raw header texts in first-seen order, deduplicated.
    pub vendors_detected: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub tolerance: f64,
}

/// Everything one reconciliation run produces. Derived, read-only, recomputed
/// in full from the two input tables.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub pairs: Vec<ReconciledPair>,
    pub missing_in_movement: Vec<ReconciledPair>,
    pub missing_in_sales: Vec<ReconciledPair>,
    pub divergences: DivergenceReport,
    pub duplicates: Vec<DuplicateKey>,
    pub salespeople: Vec<SalespersonSummary>,
    pub sales_by_hour: Vec<HourlyTotal>,
    pub sales_by_client: Vec<ClientTotal>,
    pub sales_by_origin: Vec<OriginTotal>,
    pub payment_totals: Vec<PaymentTotal>,
}
