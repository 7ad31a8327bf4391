//! Grouped summaries over the normalized records.
//!
//! All groupings keep rows with an absent key in their own bucket rather
//! than dropping them, and all run over the key-filtered record sets (rows
//! that carry a sale number).

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    ClientTotal, HourlyTotal, MovementRecord, OriginTotal, PaymentTotal, SalesRecord,
    SalespersonSummary,
};

// ---------------------------------------------------------------------------
// Salesperson summary
// ---------------------------------------------------------------------------

/// Group key-filtered movement records by the joint (code, name) pair —
/// including the all-absent pair — counting distinct sale numbers and
/// summing document values. The average is absent for an empty group, never
/// a division by zero. Sorted by total, descending.
pub fn salesperson_summaries(movement: &[MovementRecord]) -> Vec<SalespersonSummary> {
    type Key = (Option<String>, Option<String>);
    let mut groups: BTreeMap<Key, (BTreeSet<u64>, f64)> = BTreeMap::new();

    for record in movement {
        let Some(sale_number) = record.sale_number else {
            continue;
        };
        let key = (record.vendor_code.clone(), record.vendor_name.clone());
        let entry = groups.entry(key).or_default();
        entry.0.insert(sale_number);
        if let Some(value) = record.doc_value {
            entry.1 += value;
        }
    }

    let mut summaries: Vec<SalespersonSummary> = groups
        .into_iter()
        .map(|((code, name), (sale_numbers, total_value))| {
            let sale_count = sale_numbers.len();
            SalespersonSummary {
                code,
                name,
                sale_count,
                total_value,
                average_ticket: if sale_count > 0 {
                    Some(total_value / sale_count as f64)
                } else {
                    None
                },
            }
        })
        .collect();
    summaries.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    summaries
}

// ---------------------------------------------------------------------------
// Sales-side breakdowns
// ---------------------------------------------------------------------------

/// Sum of sales value by hour-of-day, absent-hour bucket first, then hour
/// order.
pub fn sales_by_hour(sales: &[SalesRecord]) -> Vec<HourlyTotal> {
    let mut buckets: BTreeMap<Option<u32>, f64> = BTreeMap::new();
    for record in sales.iter().filter(|r| r.sale_number.is_some()) {
        if let Some(value) = record.value {
            *buckets.entry(record.hour).or_default() += value;
        }
    }
    buckets
        .into_iter()
        .map(|(hour, total)| HourlyTotal { hour, total })
        .collect()
}

/// Sum of sales value by client, descending by total.
pub fn sales_by_client(sales: &[SalesRecord]) -> Vec<ClientTotal> {
    let mut buckets: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for record in sales.iter().filter(|r| r.sale_number.is_some()) {
        if let Some(value) = record.value {
            *buckets.entry(record.client.clone()).or_default() += value;
        }
    }
    let mut totals: Vec<ClientTotal> = buckets
        .into_iter()
        .map(|(client, total)| ClientTotal { client, total })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Sum of sales value by origin channel, descending by total.
pub fn sales_by_origin(sales: &[SalesRecord]) -> Vec<OriginTotal> {
    let mut buckets: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for record in sales.iter().filter(|r| r.sale_number.is_some()) {
        if let Some(value) = record.value {
            *buckets.entry(record.origin.clone()).or_default() += value;
        }
    }
    let mut totals: Vec<OriginTotal> = buckets
        .into_iter()
        .map(|(origin, total)| OriginTotal { origin, total })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

/// Coerce a payment cell to a number. On top of the usual decimal-comma
/// coercion, the movement export writes a lone `-` for zero. Anything else
/// is absent and contributes nothing.
pub fn coerce_payment(text: &str) -> Option<f64> {
    if text.trim() == "-" {
        return Some(0.0);
    }
    crate::table::coerce_number(text)
}

/// One total per allow-listed payment-method column present in the source,
/// matched case-insensitively, summed over key-filtered movement rows.
/// Columns come in declared order via `labels`; output is descending by
/// total.
pub fn payment_totals(
    labels: &[String],
    movement: &[MovementRecord],
    allow_list: &[String],
) -> Vec<PaymentTotal> {
    let allowed = |label: &str| {
        let label = label.trim();
        allow_list.iter().any(|a| label.eq_ignore_ascii_case(a))
    };

    let mut totals = Vec::new();
    for label in labels {
        if !allowed(label) {
            continue;
        }
        let total: f64 = movement
            .iter()
            .filter(|r| r.sale_number.is_some())
            .filter_map(|r| r.raw_fields.get(label))
            .filter_map(|text| coerce_payment(text))
            .sum();
        totals.push(PaymentTotal {
            method: label.clone(),
            total,
        });
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use std::collections::HashMap;

    fn mov(n: u64, value: f64, code: Option<&str>, name: Option<&str>) -> MovementRecord {
        MovementRecord {
            sale_number: Some(n),
            doc_value: Some(value),
            vendor_code: code.map(String::from),
            vendor_name: name.map(String::from),
            ..Default::default()
        }
    }

    fn sale(n: u64, value: f64, hour: Option<u32>, client: Option<&str>) -> SalesRecord {
        SalesRecord {
            sale_number: Some(n),
            value: Some(value),
            hour,
            client: client.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn groups_by_joint_code_name_including_absent() {
        let records = vec![
            mov(1, 100.0, Some("1"), Some("JOAO")),
            mov(2, 50.0, Some("1"), Some("JOAO")),
            mov(3, 30.0, None, None),
        ];
        let summaries = salesperson_summaries(&records);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].name.as_deref(), Some("JOAO"));
        assert_eq!(summaries[0].sale_count, 2);
        assert_eq!(summaries[0].total_value, 150.0);
        assert_eq!(summaries[0].average_ticket, Some(75.0));

        assert_eq!(summaries[1].code, None);
        assert_eq!(summaries[1].sale_count, 1);
    }

    #[test]
    fn sale_count_is_distinct_not_row_count() {
        let records = vec![
            mov(1, 10.0, Some("1"), Some("A")),
            mov(1, 10.0, Some("1"), Some("A")),
        ];
        let summaries = salesperson_summaries(&records);
        assert_eq!(summaries[0].sale_count, 1);
        assert_eq!(summaries[0].total_value, 20.0);
    }

    #[test]
    fn keyless_rows_do_not_form_groups() {
        let records = vec![MovementRecord::default()];
        assert!(salesperson_summaries(&records).is_empty());
    }

    #[test]
    fn hourly_buckets_keep_absent_hour() {
        let sales = vec![
            sale(1, 10.0, Some(9), None),
            sale(2, 20.0, Some(9), None),
            sale(3, 5.0, None, None),
        ];
        let by_hour = sales_by_hour(&sales);
        assert_eq!(by_hour.len(), 2);
        assert_eq!(by_hour[0].hour, None);
        assert_eq!(by_hour[0].total, 5.0);
        assert_eq!(by_hour[1].hour, Some(9));
        assert_eq!(by_hour[1].total, 30.0);
    }

    #[test]
    fn client_totals_sorted_descending() {
        let sales = vec![
            sale(1, 10.0, None, Some("ACME")),
            sale(2, 90.0, None, Some("BETA")),
            sale(3, 15.0, None, None),
        ];
        let totals = sales_by_client(&sales);
        assert_eq!(totals[0].client.as_deref(), Some("BETA"));
        assert_eq!(totals[1].client, None);
        assert_eq!(totals[2].client.as_deref(), Some("ACME"));
    }

    #[test]
    fn payment_coercion_handles_decimal_comma_and_dash() {
        assert_eq!(coerce_payment("1.234,56"), Some(1234.56));
        assert_eq!(coerce_payment("-"), Some(0.0));
        assert_eq!(coerce_payment("12,5"), Some(12.5));
        assert_eq!(coerce_payment("123.45"), Some(123.45));
        assert_eq!(coerce_payment(""), None);
        assert_eq!(coerce_payment("n/d"), None);
    }

    #[test]
    fn payment_totals_match_allow_list_case_insensitively() {
        let labels = vec!["Dinheiro".to_string(), "PIX".to_string(), "Doc/Emp".to_string()];
        let mut record = mov(1, 10.0, None, None);
        record.raw_fields = HashMap::from([
            ("Dinheiro".to_string(), "1.234,56".to_string()),
            ("PIX".to_string(), "-".to_string()),
            ("Doc/Emp".to_string(), "DOC 1".to_string()),
        ]);

        let totals = payment_totals(&labels, &[record], &config::default_payment_columns());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].method, "Dinheiro");
        assert_eq!(totals[0].total, 1234.56);
        assert_eq!(totals[1].method, "PIX");
        assert_eq!(totals[1].total, 0.0);
    }
}
