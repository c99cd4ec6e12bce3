//! Stock status classification

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived status of a product's stock at an outlet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    /// Expires within the short window (today or already past included)
    ExpiringSoon,
    NearExpiry,
    GoodStock,
}

impl StockStatus {
    /// Whether the status calls for someone to act
    pub fn needs_attention(&self) -> bool {
        !matches!(self, StockStatus::GoodStock)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::LowStock => write!(f, "Low Stock"),
            StockStatus::ExpiringSoon => write!(f, "Expiring Soon"),
            StockStatus::NearExpiry => write!(f, "Near Expiry"),
            StockStatus::GoodStock => write!(f, "Good Stock"),
        }
    }
}

/// Day windows for the expiry statuses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryWindows {
    pub expiring_soon_days: i64,
    pub near_expiry_days: i64,
}

impl Default for ExpiryWindows {
    fn default() -> Self {
        Self {
            expiring_soon_days: 1,
            near_expiry_days: 3,
        }
    }
}

/// Classify stock for display.
///
/// Stock-level checks run before expiry checks: an empty or low shelf is
/// reported even when the lot is also about to expire.
pub fn classify_stock_status(
    stock: Decimal,
    threshold: Option<Decimal>,
    expiry_date: Option<NaiveDate>,
    today: NaiveDate,
    windows: &ExpiryWindows,
) -> StockStatus {
    if stock <= Decimal::ZERO {
        return StockStatus::OutOfStock;
    }

    if let Some(min) = threshold {
        if stock <= min {
            return StockStatus::LowStock;
        }
    }

    match expiry_date.map(|date| (date - today).num_days()) {
        Some(days) if days <= windows.expiring_soon_days => StockStatus::ExpiringSoon,
        Some(days) if days <= windows.near_expiry_days => StockStatus::NearExpiry,
        _ => StockStatus::GoodStock,
    }
}
