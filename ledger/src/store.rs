//! In-memory entity store
//!
//! Holds every collection the ledger works on. Derived values (stock levels,
//! statuses) are recomputed from these collections on every read; nothing is
//! cached or indexed.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{
    aggregate_stock, classify_stock_status, find_threshold, ExpiryWindows, InventoryItem,
    LowStockThreshold, ManualOrder, MenuItem, Outlet, Product, StockReduction, StockStatus,
    Supplier, UNKNOWN_MENU_ITEM, UNKNOWN_OUTLET, UNKNOWN_PRODUCT, UNKNOWN_SUPPLIER,
};

use crate::error::AppResult;

/// All ledger collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStore {
    pub(crate) outlets: Vec<Outlet>,
    pub(crate) products: Vec<Product>,
    pub(crate) suppliers: Vec<Supplier>,
    pub(crate) menu_items: Vec<MenuItem>,
    pub(crate) lots: Vec<InventoryItem>,
    pub(crate) reductions: Vec<StockReduction>,
    pub(crate) orders: Vec<ManualOrder>,
    pub(crate) thresholds: Vec<LowStockThreshold>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON snapshot from disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let store = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            lots = store.lots.len(),
            orders = store.orders.len(),
            "Loaded store snapshot"
        );
        Ok(store)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------------

    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    pub fn lots(&self) -> &[InventoryItem] {
        &self.lots
    }

    pub fn reductions(&self) -> &[StockReduction] {
        &self.reductions
    }

    pub fn orders(&self) -> &[ManualOrder] {
        &self.orders
    }

    pub fn thresholds(&self) -> &[LowStockThreshold] {
        &self.thresholds
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn outlet(&self, id: Uuid) -> Option<&Outlet> {
        self.outlets.iter().find(|o| o.id == id)
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn supplier(&self, id: Uuid) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn menu_item(&self, id: Uuid) -> Option<&MenuItem> {
        self.menu_items.iter().find(|m| m.id == id)
    }

    pub fn order(&self, id: Uuid) -> Option<&ManualOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn outlet_name(&self, id: Uuid) -> &str {
        self.outlet(id).map_or(UNKNOWN_OUTLET, |o| o.name.as_str())
    }

    pub fn product_name(&self, id: Uuid) -> &str {
        self.product(id).map_or(UNKNOWN_PRODUCT, |p| p.name.as_str())
    }

    pub fn supplier_name(&self, id: Uuid) -> &str {
        self.supplier(id).map_or(UNKNOWN_SUPPLIER, |s| s.name.as_str())
    }

    pub fn menu_item_name(&self, id: Uuid) -> &str {
        self.menu_item(id).map_or(UNKNOWN_MENU_ITEM, |m| m.name.as_str())
    }

    // ------------------------------------------------------------------------
    // Derivations
    // ------------------------------------------------------------------------

    /// Sum of lot quantities for the pair, zero when there are no lots
    pub fn current_stock(&self, product_id: Uuid, outlet_id: Uuid) -> Decimal {
        aggregate_stock(&self.lots, product_id, outlet_id)
    }

    /// First threshold registered for the pair
    pub fn threshold_for(&self, product_id: Uuid, outlet_id: Uuid) -> Option<&LowStockThreshold> {
        find_threshold(&self.thresholds, product_id, outlet_id)
    }

    /// Lots for the pair that still hold stock
    pub fn open_lots(
        &self,
        product_id: Uuid,
        outlet_id: Uuid,
    ) -> impl Iterator<Item = &InventoryItem> {
        self.lots.iter().filter(move |lot| {
            lot.product_id == product_id && lot.outlet_id == outlet_id && !lot.is_empty()
        })
    }

    /// Earliest expiry among the pair's non-empty lots
    pub fn earliest_expiry(&self, product_id: Uuid, outlet_id: Uuid) -> Option<NaiveDate> {
        self.open_lots(product_id, outlet_id)
            .filter_map(|lot| lot.expiry_date)
            .min()
    }

    /// Status of one lot row: pair-level stock and threshold, the lot's own expiry
    pub fn lot_status(
        &self,
        lot: &InventoryItem,
        today: NaiveDate,
        windows: &ExpiryWindows,
    ) -> StockStatus {
        let stock = self.current_stock(lot.product_id, lot.outlet_id);
        let threshold = self
            .threshold_for(lot.product_id, lot.outlet_id)
            .map(|t| t.min_quantity);
        classify_stock_status(stock, threshold, lot.expiry_date, today, windows)
    }

    /// Status of a product at an outlet, judged by its earliest-expiring open lot
    pub fn product_status(
        &self,
        product_id: Uuid,
        outlet_id: Uuid,
        today: NaiveDate,
        windows: &ExpiryWindows,
    ) -> StockStatus {
        let stock = self.current_stock(product_id, outlet_id);
        let threshold = self
            .threshold_for(product_id, outlet_id)
            .map(|t| t.min_quantity);
        let expiry = self.earliest_expiry(product_id, outlet_id);
        classify_stock_status(stock, threshold, expiry, today, windows)
    }
}
