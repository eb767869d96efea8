// ⚙️ Configuration surface recognized by the pipeline entry point
// Everything else about the pipeline's behavior is fixed.

use clap::Parser;
use std::path::PathBuf;

/// Derive business KPI series from an order ledger and an item catalog.
#[derive(Debug, Parser)]
#[command(
    name = "order-kpi",
    about = "Order ledger + item catalog → KPI series for a chart dashboard"
)]
pub struct Cli {
    /// Path to the order data CSV file
    #[arg(long, default_value = "jewelry_order_form.csv")]
    pub order_data_path: PathBuf,

    /// Path to the item cost CSV file
    #[arg(long, default_value = "jewelry_prices.csv")]
    pub item_cost_path: PathBuf,

    /// Name of the column that contains date data
    #[arg(long, default_value = "Pickup Date")]
    pub date_column_name: String,

    /// Name of the column that contains customer email data
    #[arg(long, default_value = "Email Address")]
    pub email_column_name: String,

    /// Where to write the exported KPI report (JSON)
    #[arg(long, default_value = "kpi_report.json")]
    pub export_path: PathBuf,
}
