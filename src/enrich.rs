// 💰 Order Enricher - per-order value/cost/profit + calendar buckets
// Pure over its two inputs; produces a new collection, never touches the
// source records.

use crate::catalog::CatalogIndex;
use crate::error::{PipelineError, Result};
use crate::ingest::OrderRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// OrderRecord plus derived monetary totals and time buckets.
///
/// Invariant: `total_profit == total_value - total_cost` exactly, since
/// profit is computed as that difference and never re-derived.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    pub row: usize,
    pub customer_id: String,
    pub timestamp: NaiveDateTime,
    pub quantities: HashMap<String, f64>,

    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit: f64,

    /// Calendar year, e.g. "2024"
    pub year_bucket: String,
    /// Calendar month, e.g. "2024-03"
    pub month_bucket: String,
}

pub fn month_bucket(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}

pub fn year_bucket(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y").to_string()
}

/// Enrich every order with monetary totals and time buckets.
///
/// Quantities must be finite and non-negative; anything else fails the run
/// before any aggregate is computed (a negative quantity would corrupt
/// every downstream total undetected). Items unknown to the catalog
/// contribute zero value and zero cost.
pub fn enrich_orders(
    orders: &[OrderRecord],
    catalog: &CatalogIndex,
) -> Result<Vec<EnrichedOrder>> {
    let mut enriched = Vec::with_capacity(orders.len());

    for order in orders {
        let mut total_value = 0.0;
        let mut total_cost = 0.0;

        for (item, &quantity) in &order.quantities {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(PipelineError::malformed_quantity(
                    item.clone(),
                    order.row + 2,
                    format!("quantity must be finite and >= 0, got {}", quantity),
                ));
            }
            total_value += quantity * catalog.price_of(item);
            total_cost += quantity * catalog.cost_of(item);
        }

        enriched.push(EnrichedOrder {
            row: order.row,
            customer_id: order.customer_id.clone(),
            timestamp: order.timestamp,
            quantities: order.quantities.clone(),
            total_value,
            total_cost,
            total_profit: total_value - total_cost,
            year_bucket: year_bucket(&order.timestamp),
            month_bucket: month_bucket(&order.timestamp),
        });
    }

    Ok(enriched)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use chrono::NaiveDate;

    fn test_catalog() -> CatalogIndex {
        let entries = vec![
            CatalogEntry {
                item: "Cake".to_string(),
                price: 20.0,
                cost: 8.0,
            },
            CatalogEntry {
                item: "Pie".to_string(),
                price: 15.0,
                cost: 6.0,
            },
        ];
        CatalogIndex::from_entries(&entries).unwrap()
    }

    fn order(row: usize, customer: &str, date: (i32, u32, u32), items: &[(&str, f64)]) -> OrderRecord {
        OrderRecord {
            row,
            customer_id: customer.to_string(),
            timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            quantities: items
                .iter()
                .map(|(item, qty)| (item.to_string(), *qty))
                .collect(),
        }
    }

    #[test]
    fn test_totals_and_buckets() {
        let orders = vec![order(0, "alice", (2024, 3, 15), &[("Cake", 2.0), ("Pie", 1.0)])];
        let enriched = enrich_orders(&orders, &test_catalog()).unwrap();

        let e = &enriched[0];
        assert_eq!(e.total_value, 2.0 * 20.0 + 15.0);
        assert_eq!(e.total_cost, 2.0 * 8.0 + 6.0);
        assert_eq!(e.total_profit, e.total_value - e.total_cost);
        assert_eq!(e.month_bucket, "2024-03");
        assert_eq!(e.year_bucket, "2024");
    }

    #[test]
    fn test_profit_identity_holds() {
        let orders = vec![
            order(0, "alice", (2024, 1, 5), &[("Cake", 3.0)]),
            order(1, "bob", (2024, 2, 9), &[("Pie", 7.0), ("Cake", 1.0)]),
            order(2, "carol", (2025, 6, 1), &[]),
        ];
        let enriched = enrich_orders(&orders, &test_catalog()).unwrap();

        for e in &enriched {
            assert_eq!(e.total_profit, e.total_value - e.total_cost);
        }
    }

    #[test]
    fn test_absent_quantities_are_zero() {
        let orders = vec![order(0, "alice", (2024, 1, 5), &[])];
        let enriched = enrich_orders(&orders, &test_catalog()).unwrap();

        assert_eq!(enriched[0].total_value, 0.0);
        assert_eq!(enriched[0].total_cost, 0.0);
        assert_eq!(enriched[0].total_profit, 0.0);
    }

    #[test]
    fn test_unknown_item_contributes_nothing() {
        let orders = vec![order(0, "alice", (2024, 1, 5), &[("Croissant", 5.0)])];
        let enriched = enrich_orders(&orders, &test_catalog()).unwrap();

        assert_eq!(enriched[0].total_value, 0.0);
        assert_eq!(enriched[0].total_cost, 0.0);
    }

    #[test]
    fn test_negative_quantity_fails() {
        let orders = vec![order(0, "alice", (2024, 1, 5), &[("Cake", -1.0)])];
        let result = enrich_orders(&orders, &test_catalog());

        assert!(matches!(
            result,
            Err(PipelineError::MalformedQuantity { ref column, .. }) if column == "Cake"
        ));
    }

    #[test]
    fn test_year_boundary_buckets() {
        let orders = vec![
            order(0, "alice", (2023, 12, 31), &[("Cake", 1.0)]),
            order(1, "alice", (2024, 1, 1), &[("Cake", 1.0)]),
        ];
        let enriched = enrich_orders(&orders, &test_catalog()).unwrap();

        assert_eq!(enriched[0].month_bucket, "2023-12");
        assert_eq!(enriched[0].year_bucket, "2023");
        assert_eq!(enriched[1].month_bucket, "2024-01");
        assert_eq!(enriched[1].year_bucket, "2024");
    }
}
