// 📂 Tabular ingestion - CSV → typed records
// The schema contract is validated once against the header; nothing further
// downstream ever fails on a column lookup.

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::error::{PipelineError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One row of the order ledger, with raw quantities keyed by item name.
/// Absent or empty cells are simply absent from the map (treated as zero).
#[derive(Debug, Clone)]
pub struct OrderRecord {
    /// Position in the input sequence (0-based); the stable tie-break for
    /// first-order classification.
    pub row: usize,

    pub customer_id: String,

    pub timestamp: NaiveDateTime,

    pub quantities: HashMap<String, f64>,
}

/// Timestamp formats accepted in the ledger's date column.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

fn parse_timestamp(value: &str, line: usize) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(PipelineError::MalformedTimestamp {
        line,
        value: value.to_string(),
    })
}

// ============================================================================
// ITEM CATALOG
// ============================================================================

/// Load catalog rows from any reader. Header must carry Item, Price, Cost.
pub fn read_catalog_from_reader<R: Read>(reader: R) -> Result<Vec<CatalogEntry>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in ["Item", "Price", "Cost"] {
        if !headers.iter().any(|h| h == required) {
            return Err(PipelineError::missing_column(required, "item catalog"));
        }
    }

    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let entry: CatalogEntry = result?;
        entries.push(entry);
    }

    debug!(rows = entries.len(), "catalog loaded");
    Ok(entries)
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let file = File::open(path)?;
    read_catalog_from_reader(file)
}

// ============================================================================
// ORDER LEDGER
// ============================================================================

/// Load order rows from any reader.
///
/// The date and customer columns are located once in the header
/// (`MissingColumn` if absent). Quantity columns are the header names that
/// match catalog items; other columns are ignored. Empty cells are absent
/// quantities; non-numeric cells fail the run (`MalformedQuantity`).
pub fn read_orders_from_reader<R: Read>(
    reader: R,
    catalog: &CatalogIndex,
    date_column: &str,
    customer_column: &str,
) -> Result<Vec<OrderRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == date_column)
        .ok_or_else(|| PipelineError::missing_column(date_column, "order ledger"))?;
    let customer_idx = headers
        .iter()
        .position(|h| h == customer_column)
        .ok_or_else(|| PipelineError::missing_column(customer_column, "order ledger"))?;

    // Quantity columns: header ∩ catalog, in header order
    let item_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| catalog.contains(name))
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut orders = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // +2: 1-indexed data rows plus the header line
        let line = row + 2;

        let customer_id = record.get(customer_idx).unwrap_or("").trim().to_string();
        if customer_id.is_empty() {
            return Err(PipelineError::MissingCustomerId { line });
        }

        let raw_timestamp = record.get(date_idx).unwrap_or("").trim();
        let timestamp = parse_timestamp(raw_timestamp, line)?;

        let mut quantities = HashMap::new();
        for (idx, item) in &item_columns {
            let cell = record.get(*idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let quantity: f64 = cell.parse().map_err(|_| {
                PipelineError::malformed_quantity(
                    item.clone(),
                    line,
                    format!("'{}' is not a number", cell),
                )
            })?;
            quantities.insert(item.clone(), quantity);
        }

        orders.push(OrderRecord {
            row,
            customer_id,
            timestamp,
            quantities,
        });
    }

    debug!(
        rows = orders.len(),
        item_columns = item_columns.len(),
        "order ledger loaded"
    );
    Ok(orders)
}

pub fn load_orders(
    path: &Path,
    catalog: &CatalogIndex,
    date_column: &str,
    customer_column: &str,
) -> Result<Vec<OrderRecord>> {
    let file = File::open(path)?;
    read_orders_from_reader(file, catalog, date_column, customer_column)
}

// ============================================================================
// TESTS
// ============================================================================
