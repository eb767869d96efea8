// Order KPI Pipeline - Core Library
// Exposes all stages for use in the CLI and tests

pub mod error;
pub mod config;
pub mod catalog;    // Catalog Index - price/cost lookups
pub mod ingest;     // Tabular loading + schema validation
pub mod enrich;     // Order Enricher - totals + time buckets
pub mod customers;  // Customer Classifier - repeat/first flags
pub mod aggregate;  // Aggregator - one pure query per KPI
pub mod export;     // Series Exporter - chart-ready handoff

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use config::Cli;
pub use catalog::{CatalogEntry, CatalogIndex};
pub use ingest::{
    OrderRecord,
    load_catalog, load_orders, read_catalog_from_reader, read_orders_from_reader,
};
pub use enrich::{EnrichedOrder, enrich_orders};
pub use customers::{
    ClassifiedOrder, DatasetSummary,
    classify_orders, dataset_summary,
};
pub use aggregate::{Aggregator, BucketValue, ItemMonthSales, ItemTotal, OrderAverages};
pub use export::{
    ChartPoint, ChartSeries, ItemChartPoint, ItemChartSeries, KpiReport, PriceCostRow, Unit,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
