// 🏷️ Catalog Index - name→price and name→cost lookups
// Built once at load time, never mutated afterwards. Shared read-only by
// every downstream stage.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the item catalog table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Item")]
    pub item: String,

    #[serde(rename = "Price")]
    pub price: f64,

    #[serde(rename = "Cost")]
    pub cost: f64,
}

/// Price/cost lookup tables plus the catalog's original item order.
///
/// Input order matters downstream: it is the tie-break for the item
/// popularity ranking and the column-discovery order for the ledger.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    prices: HashMap<String, f64>,
    costs: HashMap<String, f64>,
    items: Vec<String>,
}

impl CatalogIndex {
    /// Build the index from catalog rows.
    ///
    /// A repeated item name with conflicting price or cost is rejected
    /// (`DuplicateItem`): letting the last write win would silently change
    /// every downstream total. An exact re-statement (same price and cost)
    /// is tolerated. Negative prices or costs are rejected.
    pub fn from_entries(entries: &[CatalogEntry]) -> Result<Self> {
        let mut prices = HashMap::new();
        let mut costs = HashMap::new();
        let mut items = Vec::new();

        for entry in entries {
            if entry.price < 0.0 || !entry.price.is_finite() {
                return Err(PipelineError::malformed_catalog(
                    &entry.item,
                    format!("price must be a non-negative number, got {}", entry.price),
                ));
            }
            if entry.cost < 0.0 || !entry.cost.is_finite() {
                return Err(PipelineError::malformed_catalog(
                    &entry.item,
                    format!("cost must be a non-negative number, got {}", entry.cost),
                ));
            }

            if let Some(&prev_price) = prices.get(&entry.item) {
                let prev_cost = costs[&entry.item];
                if prev_price != entry.price || prev_cost != entry.cost {
                    return Err(PipelineError::DuplicateItem {
                        item: entry.item.clone(),
                        first_price: prev_price,
                        first_cost: prev_cost,
                        second_price: entry.price,
                        second_cost: entry.cost,
                    });
                }
                // Exact re-statement, nothing to add
                continue;
            }

            prices.insert(entry.item.clone(), entry.price);
            costs.insert(entry.item.clone(), entry.cost);
            items.push(entry.item.clone());
        }

        Ok(CatalogIndex {
            prices,
            costs,
            items,
        })
    }

    /// Price for an item, 0.0 for unknown names.
    /// Guards against malformed ledger columns without crashing the run.
    pub fn price_of(&self, item: &str) -> f64 {
        self.prices.get(item).copied().unwrap_or(0.0)
    }

    /// Cost for an item, 0.0 for unknown names.
    pub fn cost_of(&self, item: &str) -> f64 {
        self.costs.get(item).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.prices.contains_key(item)
    }

    /// Item names in catalog input order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// (item, price, cost) rows in catalog input order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.items
            .iter()
            .map(move |item| (item.as_str(), self.prices[item], self.costs[item]))
    }
}

// ============================================================================
// TESTS
// ============================================================================
