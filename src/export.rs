// 📈 Series Exporter - chart-ready structures with explicit semantics
// Pure formatting over Aggregator output: axis titles and units travel with
// every series so the rendering layer never has to infer what a number
// means. Ordering established by the Aggregator is preserved verbatim.

use crate::aggregate::{Aggregator, BucketValue};
use crate::catalog::CatalogIndex;
use crate::customers::ClassifiedOrder;
use serde::Serialize;

/// What a series' values measure; drives axis formatting downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Currency,
    Percent,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A single named series with its axis semantics.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub x_title: String,
    pub y_title: String,
    pub unit: Unit,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    fn from_buckets(
        name: &str,
        x_title: &str,
        y_title: &str,
        unit: Unit,
        buckets: Vec<BucketValue>,
    ) -> Self {
        ChartSeries {
            name: name.to_string(),
            x_title: x_title.to_string(),
            y_title: y_title.to_string(),
            unit,
            points: buckets
                .into_iter()
                .map(|b| ChartPoint {
                    label: b.bucket,
                    value: b.value,
                })
                .collect(),
        }
    }
}

/// One row of a (label, sub-label, value) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemChartPoint {
    pub label: String,
    pub item: String,
    pub value: f64,
}

/// A long-format series keyed by (bucket, item), for faceted charts.
#[derive(Debug, Clone, Serialize)]
pub struct ItemChartSeries {
    pub name: String,
    pub x_title: String,
    pub y_title: String,
    pub unit: Unit,
    pub points: Vec<ItemChartPoint>,
}

/// Selling price next to unit cost for each catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceCostRow {
    pub item: String,
    pub price: f64,
    pub cost: f64,
}

/// The full KPI set handed to the presentation layer.
///
/// Recomputed on every run, never persisted. Field order mirrors the
/// dashboard's tabs: financial, customer, product.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    // Financial KPIs
    pub item_price_cost: Vec<PriceCostRow>,
    pub yearly_profit: ChartSeries,
    pub yearly_cost: ChartSeries,
    pub monthly_revenue: ChartSeries,
    pub monthly_cost: ChartSeries,
    pub monthly_profit: ChartSeries,

    // Customer KPIs
    pub monthly_repeat_rate: ChartSeries,
    pub monthly_new_customers: ChartSeries,

    // Product KPIs
    pub units_by_item: ChartSeries,
    pub monthly_item_sales: ItemChartSeries,
    pub monthly_total_units: ChartSeries,
    /// None when the dataset has no orders: explicitly undefined, not zero.
    pub average_order: Option<ChartSeries>,
}

impl KpiReport {
    /// Assemble every KPI series. Never fails: an empty (but valid) order
    /// set yields empty series and an undefined average.
    pub fn build(catalog: &CatalogIndex, orders: &[ClassifiedOrder]) -> Self {
        let agg = Aggregator::new(orders, catalog);

        let item_price_cost = catalog
            .entries()
            .map(|(item, price, cost)| PriceCostRow {
                item: item.to_string(),
                price,
                cost,
            })
            .collect();

        let units_by_item = ChartSeries {
            name: "Units Sold Per Item".to_string(),
            x_title: "Item".to_string(),
            y_title: "Units Sold".to_string(),
            unit: Unit::Count,
            points: agg
                .units_by_item()
                .into_iter()
                .map(|total| ChartPoint {
                    label: total.item,
                    value: total.units,
                })
                .collect(),
        };

        let monthly_item_sales = ItemChartSeries {
            name: "Monthly Sales Per Item".to_string(),
            x_title: "Year-Month".to_string(),
            y_title: "Quantity Sold".to_string(),
            unit: Unit::Count,
            points: agg
                .monthly_item_sales()
                .into_iter()
                .map(|sale| ItemChartPoint {
                    label: sale.month,
                    item: sale.item,
                    value: sale.units,
                })
                .collect(),
        };

        let average_order = agg.average_order_metrics().map(|averages| ChartSeries {
            name: "Average Order Metrics".to_string(),
            x_title: "Metric".to_string(),
            y_title: "Amount ($)".to_string(),
            unit: Unit::Currency,
            points: vec![
                ChartPoint {
                    label: "Average Order Price".to_string(),
                    value: averages.value,
                },
                ChartPoint {
                    label: "Average Order Cost".to_string(),
                    value: averages.cost,
                },
                ChartPoint {
                    label: "Average Order Profit".to_string(),
                    value: averages.profit,
                },
            ],
        });

        KpiReport {
            item_price_cost,
            yearly_profit: ChartSeries::from_buckets(
                "Sum of Total Order Profits by Year",
                "Year",
                "Total Order Profit",
                Unit::Currency,
                agg.profit_by_year(),
            ),
            yearly_cost: ChartSeries::from_buckets(
                "Sum of Total Order Costs by Year",
                "Year",
                "Total Order Cost",
                Unit::Currency,
                agg.cost_by_year(),
            ),
            monthly_revenue: ChartSeries::from_buckets(
                "Monthly Revenue Generation",
                "Year-Month",
                "Revenue ($)",
                Unit::Currency,
                agg.revenue_by_month(),
            ),
            monthly_cost: ChartSeries::from_buckets(
                "Monthly Cost of Goods Sold",
                "Year-Month",
                "COGS ($)",
                Unit::Currency,
                agg.cost_by_month(),
            ),
            monthly_profit: ChartSeries::from_buckets(
                "Monthly Profit",
                "Year-Month",
                "Profit ($)",
                Unit::Currency,
                agg.profit_by_month(),
            ),
            monthly_repeat_rate: ChartSeries::from_buckets(
                "Monthly Repeat Customer Rate",
                "Year-Month",
                "Repeat Customer Rate (%)",
                Unit::Percent,
                agg.repeat_rate_by_month(),
            ),
            monthly_new_customers: ChartSeries::from_buckets(
                "New Customers Acquired Each Month",
                "Year-Month",
                "Number of New Customers",
                Unit::Count,
                agg.new_customers_by_month(),
            ),
            units_by_item,
            monthly_item_sales,
            monthly_total_units: ChartSeries::from_buckets(
                "Total Sales Per Month",
                "Year-Month",
                "Quantity Sold",
                Unit::Count,
                agg.total_units_by_month(),
            ),
            average_order,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
