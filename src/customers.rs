// 👥 Customer Classifier - repeat/first-purchase flags + dataset summary
// A whole-dataset pass: repeat status depends on every order a customer
// placed, so flags are only assigned after a full grouping pass over the
// customer dimension.

use crate::enrich::EnrichedOrder;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// EnrichedOrder plus customer-level flags.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedOrder {
    #[serde(flatten)]
    pub order: EnrichedOrder,

    /// True for every order of a customer with >= 2 orders in the dataset,
    /// including that customer's first order.
    pub is_repeat_customer: bool,

    /// True for exactly one order per customer: the earliest timestamp,
    /// ties broken by input position.
    pub is_first_order: bool,
}

/// Dataset-level customer figures.
///
/// `repeat_rate` here is (total_orders - unique_customers) / unique_customers
/// — the average number of *extra* orders per customer. It is not the same
/// metric as the monthly repeat-order percentage and is labelled separately
/// everywhere it surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub unique_customers: usize,
    pub total_orders: usize,
    /// Average extra orders per customer
    pub repeat_rate: f64,
    /// Complement of `repeat_rate`, as reported by the summary printout
    pub unique_rate: f64,
}

/// Assign repeat/first-order flags to every order.
///
/// Two passes: first an explicit grouping index (customer → order
/// positions, in input order), then flag assignment. Orders come back in
/// their original input order.
pub fn classify_orders(orders: Vec<EnrichedOrder>) -> Vec<ClassifiedOrder> {
    // customer → positions into `orders`, preserving input order
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, order) in orders.iter().enumerate() {
        groups
            .entry(order.customer_id.as_str())
            .or_default()
            .push(pos);
    }

    let mut is_repeat = vec![false; orders.len()];
    let mut is_first = vec![false; orders.len()];

    for positions in groups.values() {
        let repeat = positions.len() >= 2;

        // Earliest timestamp wins; strict < keeps the earliest input
        // position on ties.
        let mut first_pos = positions[0];
        for &pos in &positions[1..] {
            if orders[pos].timestamp < orders[first_pos].timestamp {
                first_pos = pos;
            }
        }

        for &pos in positions {
            is_repeat[pos] = repeat;
        }
        is_first[first_pos] = true;
    }

    debug!(
        orders = orders.len(),
        customers = groups.len(),
        "customer classification complete"
    );

    orders
        .into_iter()
        .enumerate()
        .map(|(pos, order)| ClassifiedOrder {
            order,
            is_repeat_customer: is_repeat[pos],
            is_first_order: is_first[pos],
        })
        .collect()
}

/// Dataset-wide customer figures. Fails with `NoCustomers` on an empty
/// dataset: a zero denominator here is an input-data error, not a normal
/// empty state.
pub fn dataset_summary(orders: &[ClassifiedOrder]) -> Result<DatasetSummary> {
    let unique_customers = {
        let mut seen: Vec<&str> = orders
            .iter()
            .map(|o| o.order.customer_id.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    };

    if unique_customers == 0 {
        return Err(PipelineError::NoCustomers);
    }

    let total_orders = orders.len();
    let repeat_rate = (total_orders - unique_customers) as f64 / unique_customers as f64;

    Ok(DatasetSummary {
        unique_customers,
        total_orders,
        repeat_rate,
        unique_rate: 1.0 - repeat_rate,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, CatalogIndex};
    use crate::enrich::enrich_orders;
    use crate::ingest::OrderRecord;
    use chrono::NaiveDate;

    fn enriched(rows: &[(&str, (i32, u32, u32))]) -> Vec<EnrichedOrder> {
        let catalog = CatalogIndex::from_entries(&[CatalogEntry {
            item: "Cake".to_string(),
            price: 20.0,
            cost: 8.0,
        }])
        .unwrap();

        let orders: Vec<OrderRecord> = rows
            .iter()
            .enumerate()
            .map(|(row, (customer, date))| OrderRecord {
                row,
                customer_id: customer.to_string(),
                timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                quantities: HashMap::new(),
            })
            .collect();

        enrich_orders(&orders, &catalog).unwrap()
    }

    #[test]
    fn test_single_order_customer() {
        let classified = classify_orders(enriched(&[("bob", (2024, 1, 20))]));

        assert!(!classified[0].is_repeat_customer);
        assert!(classified[0].is_first_order);
    }

    #[test]
    fn test_repeat_customer_all_orders_flagged() {
        let classified = classify_orders(enriched(&[
            ("alice", (2024, 1, 5)),
            ("bob", (2024, 1, 20)),
            ("alice", (2024, 2, 2)),
        ]));

        // Every alice order is repeat, including her first
        assert!(classified[0].is_repeat_customer);
        assert!(classified[2].is_repeat_customer);
        assert!(!classified[1].is_repeat_customer);

        // Exactly one first order per customer
        assert!(classified[0].is_first_order);
        assert!(!classified[2].is_first_order);
        assert!(classified[1].is_first_order);
    }

    #[test]
    fn test_first_order_is_earliest_timestamp() {
        // Input order does not match time order
        let classified = classify_orders(enriched(&[
            ("alice", (2024, 3, 1)),
            ("alice", (2024, 1, 5)),
        ]));

        assert!(!classified[0].is_first_order);
        assert!(classified[1].is_first_order);
    }

    #[test]
    fn test_timestamp_tie_breaks_by_input_order() {
        let classified = classify_orders(enriched(&[
            ("alice", (2024, 1, 5)),
            ("alice", (2024, 1, 5)),
        ]));

        assert!(classified[0].is_first_order);
        assert!(!classified[1].is_first_order);
    }

    #[test]
    fn test_exactly_one_first_order_per_customer() {
        let classified = classify_orders(enriched(&[
            ("alice", (2024, 2, 1)),
            ("alice", (2024, 1, 1)),
            ("alice", (2024, 1, 1)),
            ("alice", (2024, 3, 1)),
        ]));

        let firsts = classified.iter().filter(|o| o.is_first_order).count();
        assert_eq!(firsts, 1);
        assert!(classified.iter().all(|o| o.is_repeat_customer));
    }

    #[test]
    fn test_dataset_summary() {
        let classified = classify_orders(enriched(&[
            ("alice", (2024, 1, 5)),
            ("bob", (2024, 1, 20)),
            ("alice", (2024, 2, 2)),
        ]));

        let summary = dataset_summary(&classified).unwrap();
        assert_eq!(summary.unique_customers, 2);
        assert_eq!(summary.total_orders, 3);
        // (3 - 2) / 2 = 0.5 extra orders per customer
        assert_eq!(summary.repeat_rate, 0.5);
        assert_eq!(summary.unique_rate, 0.5);
    }

    #[test]
    fn test_empty_dataset_summary_fails() {
        let result = dataset_summary(&[]);
        assert!(matches!(result, Err(PipelineError::NoCustomers)));
    }
}
