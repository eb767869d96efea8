use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use order_kpi::{
    classify_orders, dataset_summary, enrich_orders, load_catalog, load_orders, CatalogIndex, Cli,
    KpiReport,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("📊 Order KPI Pipeline");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load item catalog
    println!("\n📂 Loading item catalog...");
    let entries = load_catalog(&cli.item_cost_path)
        .with_context(|| format!("failed to load catalog from {}", cli.item_cost_path.display()))?;
    let catalog = CatalogIndex::from_entries(&entries)?;
    println!("✓ Catalog has {} items", catalog.len());

    // 2. Load order ledger
    println!("\n📂 Loading order ledger...");
    let orders = load_orders(
        &cli.order_data_path,
        &catalog,
        &cli.date_column_name,
        &cli.email_column_name,
    )
    .with_context(|| {
        format!(
            "failed to load orders from {}",
            cli.order_data_path.display()
        )
    })?;
    println!("✓ Loaded {} orders", orders.len());

    // 3. Enrich + classify
    let enriched = enrich_orders(&orders, &catalog)?;
    let classified = classify_orders(enriched);

    // 4. Dataset summary
    let summary = dataset_summary(&classified)?;
    println!("\nTotal Unique Customers: {}", summary.unique_customers);
    println!("Total Orders: {}", summary.total_orders);
    println!(
        "Repeat Customer Rate (avg extra orders per customer): {:.2}%",
        summary.repeat_rate * 100.0
    );
    println!("Unique Customer Rate: {:.2}%", summary.unique_rate * 100.0);

    // 5. Build and export KPI report
    println!("\n📈 Building KPI report...");
    let report = KpiReport::build(&catalog, &classified);
    let json = report.to_json()?;
    fs::write(&cli.export_path, json)
        .with_context(|| format!("failed to write {}", cli.export_path.display()))?;
    println!("✓ Report written to {}", cli.export_path.display());

    Ok(())
}
