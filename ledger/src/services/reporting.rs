//! Reporting service for per-outlet stock summaries and valuation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::{ExpiryWindows, InventorySource, StockStatus, UnitOfMeasure};

use crate::store::EntityStore;

/// Read-only reporting over the store
pub struct ReportingService<'a> {
    store: &'a EntityStore,
    windows: ExpiryWindows,
    today: NaiveDate,
}

/// Stock summary row for one product at an outlet
#[derive(Debug, Clone, Serialize)]
pub struct ProductStockRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: Option<UnitOfMeasure>,
    pub quantity: Decimal,
    pub lot_count: usize,
    pub threshold: Option<Decimal>,
    pub earliest_expiry: Option<NaiveDate>,
    pub status: StockStatus,
}

/// Status row for one lot
#[derive(Debug, Clone, Serialize)]
pub struct LotStatusRow {
    pub lot_id: Uuid,
    pub product_name: String,
    pub supplier_name: Option<String>,
    pub quantity: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub source: InventorySource,
    pub status: StockStatus,
}

/// On-hand value of one product at an outlet
#[derive(Debug, Clone, Serialize)]
pub struct ProductValuation {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    /// Quantity held in lots that carry a purchase price
    pub priced_quantity: Decimal,
    pub total_value: Decimal,
}

/// Counts of products per status at an outlet
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub out_of_stock: usize,
    pub low_stock: usize,
    pub expiring_soon: usize,
    pub near_expiry: usize,
    pub good_stock: usize,
}

impl<'a> ReportingService<'a> {
    pub fn new(store: &'a EntityStore, windows: ExpiryWindows, today: NaiveDate) -> Self {
        Self {
            store,
            windows,
            today,
        }
    }

    /// Products that have ever had a lot at the outlet, in first-received order
    fn products_at(&self, outlet_id: Uuid) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for lot in self.store.lots().iter().filter(|l| l.outlet_id == outlet_id) {
            if !ids.contains(&lot.product_id) {
                ids.push(lot.product_id);
            }
        }
        ids
    }

    /// One row per product stocked at the outlet
    pub fn outlet_stock_summary(&self, outlet_id: Uuid) -> Vec<ProductStockRow> {
        self.products_at(outlet_id)
            .into_iter()
            .map(|product_id| {
                let product = self.store.product(product_id);
                ProductStockRow {
                    product_id,
                    product_name: self.store.product_name(product_id).to_string(),
                    unit: product.map(|p| p.unit),
                    quantity: self.store.current_stock(product_id, outlet_id),
                    lot_count: self.store.open_lots(product_id, outlet_id).count(),
                    threshold: self
                        .store
                        .threshold_for(product_id, outlet_id)
                        .map(|t| t.min_quantity),
                    earliest_expiry: self.store.earliest_expiry(product_id, outlet_id),
                    status: self
                        .store
                        .product_status(product_id, outlet_id, self.today, &self.windows),
                }
            })
            .collect()
    }

    /// Status of every lot at the outlet, including emptied ones
    pub fn lot_statuses(&self, outlet_id: Uuid) -> Vec<LotStatusRow> {
        self.store
            .lots()
            .iter()
            .filter(|l| l.outlet_id == outlet_id)
            .map(|lot| LotStatusRow {
                lot_id: lot.id,
                product_name: self.store.product_name(lot.product_id).to_string(),
                supplier_name: lot
                    .supplier_id
                    .map(|id| self.store.supplier_name(id).to_string()),
                quantity: lot.quantity,
                expiry_date: lot.expiry_date,
                source: lot.source,
                status: self.store.lot_status(lot, self.today, &self.windows),
            })
            .collect()
    }

    pub fn status_counts(&self, outlet_id: Uuid) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for row in self.outlet_stock_summary(outlet_id) {
            match row.status {
                StockStatus::OutOfStock => counts.out_of_stock += 1,
                StockStatus::LowStock => counts.low_stock += 1,
                StockStatus::ExpiringSoon => counts.expiring_soon += 1,
                StockStatus::NearExpiry => counts.near_expiry += 1,
                StockStatus::GoodStock => counts.good_stock += 1,
            }
        }
        counts
    }

    /// Purchase value of on-hand stock. Unpriced lots add quantity but no value.
    pub fn valuation(&self, outlet_id: Uuid) -> Vec<ProductValuation> {
        self.products_at(outlet_id)
            .into_iter()
            .map(|product_id| {
                let mut quantity = Decimal::ZERO;
                let mut priced_quantity = Decimal::ZERO;
                let mut total_value = Decimal::ZERO;

                for lot in self.store.open_lots(product_id, outlet_id) {
                    quantity = quantity.saturating_add(lot.quantity);
                    if let Some(value) = lot.value() {
                        priced_quantity = priced_quantity.saturating_add(lot.quantity);
                        total_value = total_value.saturating_add(value);
                    }
                }

                ProductValuation {
                    product_id,
                    product_name: self.store.product_name(product_id).to_string(),
                    quantity,
                    priced_quantity,
                    total_value,
                }
            })
            .collect()
    }

    /// Plain-text stock table for the outlet
    pub fn render_stock_table(&self, outlet_id: Uuid) -> String {
        let mut out = format!(
            "Stock at {} as of {}\n",
            self.store.outlet_name(outlet_id),
            self.today
        );
        out.push_str(&format!(
            "{:<28} {:>10} {:<6} {:>5} {:>10} {:<12} {}\n",
            "Product", "Qty", "Unit", "Lots", "Min", "Expiry", "Status"
        ));

        for row in self.outlet_stock_summary(outlet_id) {
            out.push_str(&format!(
                "{:<28} {:>10} {:<6} {:>5} {:>10} {:<12} {}\n",
                row.product_name,
                row.quantity.normalize().to_string(),
                row.unit.map(|u| u.symbol()).unwrap_or("-"),
                row.lot_count,
                row.threshold
                    .map(|t| t.normalize().to_string())
                    .unwrap_or_else(|| "-".to_string()),
                row.earliest_expiry
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                row.status
            ));
        }
        out
    }
}
