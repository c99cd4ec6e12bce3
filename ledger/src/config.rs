//! Configuration management for the Restaurant Inventory Ledger
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with RIM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::ExpiryWindows;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Stock status configuration
    pub stock: StockConfig,

    /// Where snapshots and persisted blobs live
    #[serde(default)]
    pub store: StoreConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StockConfig {
    /// Days before expiry at which a lot is "expiring soon" (today counts as 0)
    pub expiring_soon_days: i64,

    /// Days before expiry at which a lot is "near expiry"
    pub near_expiry_days: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot of the whole entity store
    pub snapshot_path: Option<String>,

    /// Stored `lowStockThresholds` blob
    pub thresholds_path: Option<String>,

    /// Stored `selectedOutlet` blob
    pub selected_outlet_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RIM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("stock.expiring_soon_days", 1)?
            .set_default("stock.near_expiry_days", 3)?
            .set_default("logging.filter", "restaurant_inventory_ledger=info,rim_ledger=info")?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RIM_ prefix)
            .add_source(
                Environment::with_prefix("RIM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the stock classifier cannot work with
    pub fn validate(&self) -> AppResult<()> {
        if self.stock.expiring_soon_days < 0 {
            return Err(AppError::Configuration(
                "stock.expiring_soon_days cannot be negative".to_string(),
            ));
        }
        if self.stock.near_expiry_days < self.stock.expiring_soon_days {
            return Err(AppError::Configuration(
                "stock.near_expiry_days must be at least stock.expiring_soon_days".to_string(),
            ));
        }
        Ok(())
    }
}

impl StockConfig {
    pub fn windows(&self) -> ExpiryWindows {
        ExpiryWindows {
            expiring_soon_days: self.expiring_soon_days,
            near_expiry_days: self.near_expiry_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            stock: StockConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StockConfig {
    fn default() -> Self {
        let windows = ExpiryWindows::default();
        Self {
            expiring_soon_days: windows.expiring_soon_days,
            near_expiry_days: windows.near_expiry_days,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "restaurant_inventory_ledger=info,rim_ledger=info".to_string(),
            json: false,
        }
    }
}
