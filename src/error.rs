// Pipeline error taxonomy
//
// Structural errors (catalog conflicts, missing columns) abort before any
// aggregate is computed. Per-row data errors are also fatal: silently
// dropping one order would desynchronize customer classification from the
// financial totals.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Same catalog item listed twice with conflicting price or cost
    #[error(
        "duplicate catalog item '{item}' with conflicting values: \
         price {first_price}/cost {first_cost} vs price {second_price}/cost {second_cost}"
    )]
    DuplicateItem {
        item: String,
        first_price: f64,
        first_cost: f64,
        second_price: f64,
        second_cost: f64,
    },

    /// Catalog row with a non-numeric or negative price/cost
    #[error("malformed catalog entry for '{item}': {detail}")]
    MalformedCatalogEntry { item: String, detail: String },

    /// Order quantity that is non-numeric, negative, or non-finite
    #[error("malformed quantity in column '{column}' at ledger line {line}: {detail}")]
    MalformedQuantity {
        column: String,
        line: usize,
        detail: String,
    },

    /// Order timestamp that matches none of the accepted formats
    #[error("malformed timestamp at ledger line {line}: '{value}'")]
    MalformedTimestamp { line: usize, value: String },

    /// Order row with an empty customer identifier
    #[error("empty customer identifier at ledger line {line}")]
    MissingCustomerId { line: usize },

    /// Required column absent from an input table's header
    #[error("required column '{column}' missing from {table}")]
    MissingColumn { column: String, table: String },

    /// Dataset-wide repeat rate requested for a dataset with no customers
    #[error("dataset contains no customers; repeat rate is undefined")]
    NoCustomers,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn malformed_quantity(
        column: impl Into<String>,
        line: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self::MalformedQuantity {
            column: column.into(),
            line,
            detail: detail.into(),
        }
    }

    pub fn malformed_catalog(item: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedCatalogEntry {
            item: item.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
