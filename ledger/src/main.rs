//! Restaurant Inventory Ledger - stock report
//!
//! Loads a store snapshot plus the persisted threshold and outlet-selection
//! blobs, then prints the stock table and tripped thresholds for the
//! selected outlet.
//!
//! Usage: `rim-ledger [SNAPSHOT_PATH]` (falls back to `store.snapshot_path`)

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use restaurant_inventory_ledger::{Config, EntityStore, Session};
use shared::Actor;

fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    config.validate()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Restaurant Inventory Ledger report");
    tracing::info!("Environment: {}", config.environment);

    let snapshot_path = std::env::args()
        .nth(1)
        .or_else(|| config.store.snapshot_path.clone())
        .context("No snapshot given: pass a path or set RIM_STORE__SNAPSHOT_PATH")?;
    let store = EntityStore::load(&snapshot_path)
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path))?;

    let thresholds_path = config.store.thresholds_path.clone();
    let selected_outlet_path = config.store.selected_outlet_path.clone();
    let mut session = Session::with_store(config, Actor::system(), store);

    let thresholds_raw = thresholds_path
        .map(|path| {
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read thresholds from {}", path))
        })
        .transpose()?;
    let selected_outlet_raw = selected_outlet_path
        .map(|path| {
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read selected outlet from {}", path))
        })
        .transpose()?;

    let problems =
        session.restore_persisted(thresholds_raw.as_deref(), selected_outlet_raw.as_deref());
    for problem in problems {
        tracing::warn!(
            code = %problem.code,
            message = %problem.message,
            "Ignoring unreadable persisted value"
        );
    }

    if session.selected_outlet().is_none() {
        let first_active = session
            .store()
            .outlets()
            .iter()
            .find(|o| o.is_active)
            .map(|o| o.id);
        session.select_outlet(first_active)?;
    }

    let Some(outlet_id) = session.selected_outlet() else {
        tracing::warn!("Snapshot has no active outlet; nothing to report");
        return Ok(());
    };

    let reports = session.reports();
    let counts = reports.status_counts(outlet_id);
    tracing::info!(
        out_of_stock = counts.out_of_stock,
        low_stock = counts.low_stock,
        expiring_soon = counts.expiring_soon,
        near_expiry = counts.near_expiry,
        good_stock = counts.good_stock,
        "Computed stock statuses"
    );

    println!("{}", reports.render_stock_table(outlet_id));

    let triggered = session.thresholds().triggered(Some(outlet_id));
    if triggered.is_empty() {
        println!("No low-stock thresholds tripped.");
    } else {
        println!("Low-stock thresholds tripped:");
        for t in triggered {
            println!(
                "  {} at {}: {} on hand, minimum {}",
                t.product_name,
                t.outlet_name,
                t.current_stock.normalize(),
                t.threshold.min_quantity.normalize()
            );
        }
    }

    Ok(())
}
