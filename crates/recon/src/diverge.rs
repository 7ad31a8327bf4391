//! Value-divergence detection over fully-matched pairs.

use crate::model::{Divergence, DivergenceReport, ReconciledPair};

/// Compare paired monetary values. Only pairs where BOTH values are present
/// enter the compared subset — rows missing either side are reported as
/// missing elsewhere, never as zero-divergence here. The total signed
/// difference covers the whole compared subset, not just divergent rows.
///
/// The threshold is strict: a difference of exactly `tolerance` does not
/// diverge.
pub fn detect(pairs: &[ReconciledPair], tolerance: f64) -> DivergenceReport {
    let mut report = DivergenceReport::default();

    for pair in pairs {
        let (Some(sales), Some(movement)) = (&pair.sales, &pair.movement) else {
            continue;
        };
        let (Some(sales_value), Some(movement_value)) = (sales.value, movement.doc_value) else {
            continue;
        };

        let difference = sales_value - movement_value;
        report.compared += 1;
        report.total_difference += difference;

        if difference.abs() > tolerance {
            report.rows.push(Divergence {
                sale_number: pair.sale_number,
                sales_value,
                movement_value,
                difference,
                vendor_code: movement.vendor_code.clone(),
                vendor_name: movement.vendor_name.clone(),
            });
        }
    }

    report
}
