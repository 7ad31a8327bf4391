//! Headline figures computed from a finished run.

use std::collections::BTreeSet;

use crate::model::{
    DivergenceReport, DuplicateKey, MovementRecord, ReconSummary, ReconciledPair, SalesRecord,
};

/// Compute the summary block: distinct counts, totals and average tickets per
/// side, match/missing counts, divergence rate, and the detected salesperson
/// headers (first-seen order, deduplicated, taken from all movement rows —
/// header rows carry no sale number but still count).
pub fn compute_summary(
    sales: &[SalesRecord],
    movement: &[MovementRecord],
    pairs: &[ReconciledPair],
    divergences: &DivergenceReport,
    duplicates: &[DuplicateKey],
) -> ReconSummary {
    let sales_keys: BTreeSet<u64> = sales.iter().filter_map(|r| r.sale_number).collect();
    let movement_keys: BTreeSet<u64> = movement.iter().filter_map(|r| r.sale_number).collect();

    let sales_total: f64 = sales
        .iter()
        .filter(|r| r.sale_number.is_some())
        .filter_map(|r| r.value)
        .sum();
    let movement_total: f64 = movement
        .iter()
        .filter(|r| r.sale_number.is_some())
        .filter_map(|r| r.doc_value)
        .sum();

    let average = |total: f64, count: usize| {
        if count > 0 {
            Some(total / count as f64)
        } else {
            None
        }
    };

    let mut vendors_detected = Vec::new();
    for record in movement {
        if let Some(header) = &record.vendor_header {
            if !vendors_detected.contains(header) {
                vendors_detected.push(header.clone());
            }
        }
    }

    let matched = pairs
        .iter()
        .filter(|p| p.sales.is_some() && p.movement.is_some())
        .count();
    let missing_in_movement = pairs.iter().filter(|p| p.movement.is_none()).count();
    let missing_in_sales = pairs.iter().filter(|p| p.sales.is_none()).count();

    let divergent = divergences.rows.len();
    let divergence_rate = divergent as f64 / divergences.compared.max(1) as f64 * 100.0;

    ReconSummary {
        sales_count: sales_keys.len(),
        movement_count: movement_keys.len(),
        sales_total,
        movement_total,
        sales_average_ticket: average(sales_total, sales_keys.len()),
        movement_average_ticket: average(movement_total, movement_keys.len()),
        matched,
        missing_in_movement,
        missing_in_sales,
        divergent,
        divergence_rate,
        total_difference: divergences.total_difference,
        duplicate_keys: duplicates.len(),
        vendors_detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_yield_absent_averages() {
        let summary = compute_summary(&[], &[], &[], &DivergenceReport::default(), &[]);
        assert_eq!(summary.sales_count, 0);
        assert_eq!(summary.sales_average_ticket, None);
        assert_eq!(summary.movement_average_ticket, None);
        assert_eq!(summary.divergence_rate, 0.0);
    }

    #[test]
    fn distinct_counts_and_averages() {
        let sales = vec![
            SalesRecord {
                sale_number: Some(1),
                value: Some(30.0),
                ..Default::default()
            },
            SalesRecord {
                sale_number: Some(1),
                value: Some(30.0),
                ..Default::default()
            },
            SalesRecord {
                sale_number: Some(2),
                value: Some(30.0),
                ..Default::default()
            },
        ];
        let summary = compute_summary(&sales, &[], &[], &DivergenceReport::default(), &[]);
        assert_eq!(summary.sales_count, 2);
        assert_eq!(summary.sales_total, 90.0);
        assert_eq!(summary.sales_average_ticket, Some(45.0));
    }

    #[test]
    fn vendors_detected_in_first_seen_order() {
        let movement = vec![
            MovementRecord {
                vendor_header: Some("Vendedor: 2 - B".into()),
                ..Default::default()
            },
            MovementRecord {
                vendor_header: Some("Vendedor: 1 - A".into()),
                ..Default::default()
            },
            MovementRecord {
                vendor_header: Some("Vendedor: 2 - B".into()),
                ..Default::default()
            },
        ];
        let summary = compute_summary(&[], &movement, &[], &DivergenceReport::default(), &[]);
        assert_eq!(
            summary.vendors_detected,
            vec!["Vendedor: 2 - B".to_string(), "Vendedor: 1 - A".to_string()]
        );
    }
}
