// 📊 Aggregator - one pure query per KPI
// All queries run over the classified order set; none mutates shared state,
// so they are independently callable (and safely parallelizable) once
// classification is done.
//
// Bucket keys are zero-padded ("2024-03"), so the BTreeMap grouping used
// throughout yields chronological order for free.

use crate::catalog::CatalogIndex;
use crate::customers::ClassifiedOrder;
use serde::Serialize;
use std::collections::BTreeMap;

/// One (bucket, value) point of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketValue {
    pub bucket: String,
    pub value: f64,
}

/// Total units sold for one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTotal {
    pub item: String,
    pub units: f64,
}

/// Units of one item sold in one month. Only present (month, item) pairs
/// with units > 0 appear; the series is sparse by design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMonthSales {
    pub month: String,
    pub item: String,
    pub units: f64,
}

/// Arithmetic means across all orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAverages {
    pub value: f64,
    pub cost: f64,
    pub profit: f64,
}

/// KPI queries over a classified order set.
pub struct Aggregator<'a> {
    orders: &'a [ClassifiedOrder],
    catalog: &'a CatalogIndex,
}

impl<'a> Aggregator<'a> {
    pub fn new(orders: &'a [ClassifiedOrder], catalog: &'a CatalogIndex) -> Self {
        Aggregator { orders, catalog }
    }

    fn sum_by_bucket(
        &self,
        bucket_of: impl Fn(&ClassifiedOrder) -> &str,
        value_of: impl Fn(&ClassifiedOrder) -> f64,
    ) -> Vec<BucketValue> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for order in self.orders {
            *totals.entry(bucket_of(order).to_string()).or_insert(0.0) += value_of(order);
        }
        totals
            .into_iter()
            .map(|(bucket, value)| BucketValue { bucket, value })
            .collect()
    }

    /// Monthly revenue (sum of order values), chronological.
    pub fn revenue_by_month(&self) -> Vec<BucketValue> {
        self.sum_by_bucket(|o| o.order.month_bucket.as_str(), |o| o.order.total_value)
    }

    /// Monthly cost of goods sold, chronological.
    pub fn cost_by_month(&self) -> Vec<BucketValue> {
        self.sum_by_bucket(|o| o.order.month_bucket.as_str(), |o| o.order.total_cost)
    }

    /// Monthly profit, chronological.
    pub fn profit_by_month(&self) -> Vec<BucketValue> {
        self.sum_by_bucket(|o| o.order.month_bucket.as_str(), |o| o.order.total_profit)
    }

    /// Yearly profit, chronological.
    pub fn profit_by_year(&self) -> Vec<BucketValue> {
        self.sum_by_bucket(|o| o.order.year_bucket.as_str(), |o| o.order.total_profit)
    }

    /// Yearly cost, chronological.
    pub fn cost_by_year(&self) -> Vec<BucketValue> {
        self.sum_by_bucket(|o| o.order.year_bucket.as_str(), |o| o.order.total_cost)
    }

    /// Percentage of each month's orders placed by repeat customers.
    /// Only months with at least one order appear, so the rate is always
    /// well-defined and within [0, 100].
    pub fn repeat_rate_by_month(&self) -> Vec<BucketValue> {
        let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for order in self.orders {
            let entry = counts
                .entry(order.order.month_bucket.clone())
                .or_insert((0, 0));
            entry.0 += 1;
            if order.is_repeat_customer {
                entry.1 += 1;
            }
        }
        counts
            .into_iter()
            .map(|(bucket, (total, repeat))| BucketValue {
                bucket,
                value: repeat as f64 / total as f64 * 100.0,
            })
            .collect()
    }

    /// Number of first orders per month: new customers acquired.
    /// Every month with at least one order appears, zero-filled when none
    /// of its orders were a customer's first.
    pub fn new_customers_by_month(&self) -> Vec<BucketValue> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for order in self.orders {
            let count = counts.entry(order.order.month_bucket.clone()).or_insert(0);
            if order.is_first_order {
                *count += 1;
            }
        }
        counts
            .into_iter()
            .map(|(bucket, count)| BucketValue {
                bucket,
                value: count as f64,
            })
            .collect()
    }

    /// Total units sold per catalog item across all orders, ordered by
    /// descending total. Ties keep catalog input order (stable sort).
    pub fn units_by_item(&self) -> Vec<ItemTotal> {
        let mut totals: Vec<ItemTotal> = self
            .catalog
            .items()
            .iter()
            .map(|item| ItemTotal {
                item: item.clone(),
                units: self
                    .orders
                    .iter()
                    .filter_map(|o| o.order.quantities.get(item))
                    .sum(),
            })
            .collect();

        totals.sort_by(|a, b| b.units.total_cmp(&a.units));
        totals
    }

    /// Units per (month, item), sparse: pairs with zero or missing
    /// quantity are excluded. Month-chronological; catalog order within
    /// a month.
    pub fn monthly_item_sales(&self) -> Vec<ItemMonthSales> {
        let mut by_month: BTreeMap<&str, BTreeMap<usize, f64>> = BTreeMap::new();
        let item_rank: BTreeMap<&str, usize> = self
            .catalog
            .items()
            .iter()
            .enumerate()
            .map(|(rank, item)| (item.as_str(), rank))
            .collect();

        for order in self.orders {
            for (item, &units) in &order.order.quantities {
                if units <= 0.0 {
                    continue;
                }
                let Some(&rank) = item_rank.get(item.as_str()) else {
                    continue;
                };
                *by_month
                    .entry(order.order.month_bucket.as_str())
                    .or_default()
                    .entry(rank)
                    .or_insert(0.0) += units;
            }
        }

        let items = self.catalog.items();
        by_month
            .into_iter()
            .flat_map(|(month, per_item)| {
                per_item.into_iter().map(move |(rank, units)| ItemMonthSales {
                    month: month.to_string(),
                    item: items[rank].clone(),
                    units,
                })
            })
            .collect()
    }

    /// Total units sold per month across all items; the overlay line for
    /// the per-item monthly chart.
    pub fn total_units_by_month(&self) -> Vec<BucketValue> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for sale in self.monthly_item_sales() {
            *totals.entry(sale.month).or_insert(0.0) += sale.units;
        }
        totals
            .into_iter()
            .map(|(bucket, value)| BucketValue { bucket, value })
            .collect()
    }

    /// Mean order value/cost/profit. None for an empty order set (an
    /// explicit empty result, never NaN).
    pub fn average_order_metrics(&self) -> Option<OrderAverages> {
        if self.orders.is_empty() {
            return None;
        }
        let n = self.orders.len() as f64;
        Some(OrderAverages {
            value: self.orders.iter().map(|o| o.order.total_value).sum::<f64>() / n,
            cost: self.orders.iter().map(|o| o.order.total_cost).sum::<f64>() / n,
            profit: self.orders.iter().map(|o| o.order.total_profit).sum::<f64>() / n,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
