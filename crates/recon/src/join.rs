//! Full outer join of the two normalized tables on the sale number.

use std::collections::BTreeMap;

use crate::model::{DuplicateKey, JoinOutput, MovementRecord, ReconciledPair, SalesRecord, Side};

/// Filter both sides to rows with a present sale number, then full outer
/// join. Keys duplicated within a source are not rejected: all combinations
/// are produced (standard relational semantics) and the duplication is
/// reported per side. Output is ordered by sale number.
pub fn outer_join(sales: &[SalesRecord], movement: &[MovementRecord]) -> JoinOutput {
    let mut by_key_sales: BTreeMap<u64, Vec<&SalesRecord>> = BTreeMap::new();
    for record in sales {
        if let Some(key) = record.sale_number {
            by_key_sales.entry(key).or_default().push(record);
        }
    }

    let mut by_key_movement: BTreeMap<u64, Vec<&MovementRecord>> = BTreeMap::new();
    for record in movement {
        if let Some(key) = record.sale_number {
            by_key_movement.entry(key).or_default().push(record);
        }
    }

    let mut duplicates = Vec::new();
    for (key, group) in &by_key_sales {
        if group.len() > 1 {
            duplicates.push(DuplicateKey {
                side: Side::Sales,
                sale_number: *key,
                count: group.len(),
            });
        }
    }
    for (key, group) in &by_key_movement {
        if group.len() > 1 {
            duplicates.push(DuplicateKey {
                side: Side::Movement,
                sale_number: *key,
                count: group.len(),
            });
        }
    }

    let mut keys: Vec<u64> = by_key_sales.keys().copied().collect();
    keys.extend(by_key_movement.keys().copied());
    keys.sort_unstable();
    keys.dedup();

    let mut pairs = Vec::new();
    for key in keys {
        match (by_key_sales.get(&key), by_key_movement.get(&key)) {
            (Some(sl), Some(ml)) => {
                for s in sl {
                    for m in ml {
                        pairs.push(ReconciledPair {
                            sale_number: key,
                            sales: Some((*s).clone()),
                            movement: Some((*m).clone()),
                        });
                    }
                }
            }
            (Some(sl), None) => {
                for s in sl {
                    pairs.push(ReconciledPair {
                        sale_number: key,
                        sales: Some((*s).clone()),
                        movement: None,
                    });
                }
            }
            (None, Some(ml)) => {
                for m in ml {
                    pairs.push(ReconciledPair {
                        sale_number: key,
                        sales: None,
                        movement: Some((*m).clone()),
                    });
                }
            }
            (None, None) => unreachable!("key came from one of the two maps"),
        }
    }

    JoinOutput { pairs, duplicates }
}

/// Pairs with no movement counterpart.
pub fn missing_in_movement(pairs: &[ReconciledPair]) -> Vec<ReconciledPair> {
    pairs
        .iter()
        .filter(|p| p.movement.is_none())
        .cloned()
        .collect()
}

/// Pairs with no sales counterpart.
pub fn missing_in_sales(pairs: &[ReconciledPair]) -> Vec<ReconciledPair> {
    pairs
        .iter()
        .filter(|p| p.sales.is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(n: u64) -> SalesRecord {
        SalesRecord {
            sale_number: Some(n),
            value: Some(n as f64),
            ..Default::default()
        }
    }

    fn mov(n: u64) -> MovementRecord {
        MovementRecord {
            sale_number: Some(n),
            doc_value: Some(n as f64),
            ..Default::default()
        }
    }

    #[test]
    fn join_is_complete() {
        let sales = vec![sale(501), sale(503)];
        let movement = vec![mov(501), mov(502)];
        let out = outer_join(&sales, &movement);

        assert_eq!(out.pairs.len(), 3);
        let keys: Vec<u64> = out.pairs.iter().map(|p| p.sale_number).collect();
        assert_eq!(keys, vec![501, 502, 503]);

        assert!(out.pairs[0].sales.is_some() && out.pairs[0].movement.is_some());
        assert!(out.pairs[1].sales.is_none() && out.pairs[1].movement.is_some());
        assert!(out.pairs[2].sales.is_some() && out.pairs[2].movement.is_none());
        assert!(out.duplicates.is_empty());
    }

    #[test]
    fn keyless_rows_are_excluded() {
        let sales = vec![SalesRecord::default()];
        let movement = vec![MovementRecord::default()];
        let out = outer_join(&sales, &movement);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn duplicate_keys_cross_multiply_and_are_reported() {
        let sales = vec![sale(9), sale(9)];
        let movement = vec![mov(9), mov(9), mov(9)];
        let out = outer_join(&sales, &movement);

        assert_eq!(out.pairs.len(), 6);
        assert_eq!(out.duplicates.len(), 2);
        assert_eq!(out.duplicates[0].side, Side::Sales);
        assert_eq!(out.duplicates[0].count, 2);
        assert_eq!(out.duplicates[1].side, Side::Movement);
        assert_eq!(out.duplicates[1].count, 3);
    }

    #[test]
    fn partitions_split_by_absent_side() {
        let sales = vec![sale(1), sale(2)];
        let movement = vec![mov(2), mov(3)];
        let out = outer_join(&sales, &movement);

        let missing_mov = missing_in_movement(&out.pairs);
        assert_eq!(missing_mov.len(), 1);
        assert_eq!(missing_mov[0].sale_number, 1);

        let missing_sales = missing_in_sales(&out.pairs);
        assert_eq!(missing_sales.len(), 1);
        assert_eq!(missing_sales[0].sale_number, 3);
    }
}
