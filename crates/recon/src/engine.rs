use crate::aggregate;
use crate::config::ReconOptions;
use crate::diverge;
use crate::error::ReconError;
use crate::join;
use crate::model::{ReconMeta, ReconResult};
use crate::normalize;
use crate::summary::compute_summary;
use crate::table::Table;

/// Run one reconciliation: normalize both tables, join on the sale number,
/// detect divergences, aggregate, summarize. Inputs are immutable; every
/// output is freshly derived. Malformed business data never fails a run —
/// only invalid options do.
pub fn run(
    movement: &Table,
    sales: &Table,
    options: &ReconOptions,
) -> Result<ReconResult, ReconError> {
    options.validate()?;

    let movement_records = normalize::normalize_movement(movement);
    let sales_records = normalize::normalize_sales(sales);

    let join_output = join::outer_join(&sales_records, &movement_records);
    let missing_in_movement = join::missing_in_movement(&join_output.pairs);
    let missing_in_sales = join::missing_in_sales(&join_output.pairs);
    let divergences = diverge::detect(&join_output.pairs, options.tolerance);

    let summary = compute_summary(
        &sales_records,
        &movement_records,
        &join_output.pairs,
        &divergences,
        &join_output.duplicates,
    );

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            tolerance: options.tolerance,
        },
        summary,
        salespeople: aggregate::salesperson_summaries(&movement_records),
        sales_by_hour: aggregate::sales_by_hour(&sales_records),
        sales_by_client: aggregate::sales_by_client(&sales_records),
        sales_by_origin: aggregate::sales_by_origin(&sales_records),
        payment_totals: aggregate::payment_totals(
            &movement.labels,
            &movement_records,
            &options.payment_columns,
        ),
        pairs: join_output.pairs,
        missing_in_movement,
        missing_in_sales,
        divergences,
        duplicates: join_output.duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn invalid_options_fail_the_run() {
        let empty = Table::new("x", vec![]);
        let options = ReconOptions {
            tolerance: -0.5,
            ..Default::default()
        };
        assert!(run(&empty, &empty, &options).is_err());
    }

    #[test]
    fn empty_tables_produce_an_empty_result() {
        let movement = Table::new("MovimentoDiario", vec!["Doc/Emp".into()]);
        let sales = Table::new("Planilha1", vec!["Doc.".into()]);
        let result = run(&movement, &sales, &ReconOptions::default()).unwrap();

        assert!(result.pairs.is_empty());
        assert!(result.salespeople.is_empty());
        assert_eq!(result.summary.sales_count, 0);
        assert_eq!(result.summary.sales_average_ticket, None);
        assert_eq!(result.meta.tolerance, 0.01);
    }

    #[test]
    fn rows_without_keys_stay_out_of_the_join_but_in_the_counts() {
        let mut movement = Table::new("MovimentoDiario", vec!["Doc/Emp".into()]);
        movement.push_row(vec![Cell::Text("sem referencia".into())]);
        movement.push_row(vec![Cell::Text("DOC 77".into())]);
        let sales = Table::new("Planilha1", vec!["Doc.".into()]);

        let result = run(&movement, &sales, &ReconOptions::default()).unwrap();
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.summary.movement_count, 1);
        assert_eq!(result.summary.missing_in_sales, 1);
    }
}
