//! Inventory service for receiving lots and recording stock reductions

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{
    consumption_order, validate_batch_number, validate_purchase_price, validate_quantity, Actor,
    InventoryItem, InventorySource, ReductionReason, StockReduction,
};

use crate::error::{AppError, AppResult};
use crate::store::EntityStore;

/// Inventory service over the session's store
pub struct InventoryService<'a> {
    store: &'a mut EntityStore,
    actor: &'a Actor,
}

/// Input for receiving a lot
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveLotInput {
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub quantity: Decimal,
    pub expiry_date: Option<NaiveDate>,
    /// Falls back to the product's default supplier
    pub supplier_id: Option<Uuid>,
    pub source: Option<InventorySource>,
    pub batch_number: Option<String>,
    pub purchase_price: Option<Decimal>,
}

/// Input for reducing stock by hand
#[derive(Debug, Clone, Deserialize)]
pub struct ReduceStockInput {
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub quantity: Decimal,
    pub reason: ReductionReason,
    pub notes: Option<String>,
}

impl<'a> InventoryService<'a> {
    pub fn new(store: &'a mut EntityStore, actor: &'a Actor) -> Self {
        Self { store, actor }
    }

    /// Record a received lot
    pub fn receive_lot(&mut self, input: ReceiveLotInput) -> AppResult<InventoryItem> {
        validate_quantity(input.quantity).map_err(|m| AppError::validation("quantity", m))?;
        validate_purchase_price(input.purchase_price)
            .map_err(|m| AppError::validation("purchase_price", m))?;
        if let Some(batch) = &input.batch_number {
            validate_batch_number(batch).map_err(|m| AppError::validation("batch_number", m))?;
        }

        let product = self
            .store
            .product(input.product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        if self.store.outlet(input.outlet_id).is_none() {
            return Err(AppError::NotFound("Outlet".to_string()));
        }

        let supplier_id = input.supplier_id.or(product.default_supplier_id);
        if let Some(id) = supplier_id {
            if self.store.supplier(id).is_none() {
                tracing::warn!(supplier_id = %id, "Receiving lot from unknown supplier");
            }
        }

        let lot = InventoryItem {
            id: Uuid::new_v4(),
            product_id: input.product_id,
            outlet_id: input.outlet_id,
            received_quantity: input.quantity,
            quantity: input.quantity,
            expiry_date: input.expiry_date,
            supplier_id,
            source: input.source.unwrap_or(InventorySource::Purchase),
            batch_number: input.batch_number,
            purchase_price: input.purchase_price,
            reference_order_id: None,
            created_by: self.actor.clone(),
            created_at: Utc::now(),
        };

        tracing::info!(
            lot_id = %lot.id,
            product = self.store.product_name(lot.product_id),
            outlet = self.store.outlet_name(lot.outlet_id),
            quantity = %lot.quantity,
            "Received inventory lot"
        );

        self.store.lots.push(lot.clone());
        Ok(lot)
    }

    /// Reduce stock by hand, clamping at zero
    pub fn reduce_stock(&mut self, input: ReduceStockInput) -> AppResult<StockReduction> {
        validate_quantity(input.quantity).map_err(|m| AppError::validation("quantity", m))?;
        if self.store.product(input.product_id).is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }
        if self.store.outlet(input.outlet_id).is_none() {
            return Err(AppError::NotFound("Outlet".to_string()));
        }

        Ok(apply_reduction(
            self.store,
            Reduction {
                product_id: input.product_id,
                outlet_id: input.outlet_id,
                quantity: input.quantity,
                reason: input.reason,
                notes: input.notes,
                reference_order_id: None,
            },
            self.actor,
        ))
    }

    /// Aggregated stock for a product at an outlet
    pub fn current_stock(&self, product_id: Uuid, outlet_id: Uuid) -> Decimal {
        self.store.current_stock(product_id, outlet_id)
    }

    /// Lots at an outlet, newest first
    pub fn list_lots(&self, outlet_id: Uuid) -> Vec<&InventoryItem> {
        let mut lots: Vec<_> = self
            .store
            .lots
            .iter()
            .filter(|lot| lot.outlet_id == outlet_id)
            .collect();
        lots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        lots
    }

    /// Reductions at an outlet, newest first
    pub fn list_reductions(&self, outlet_id: Uuid) -> Vec<&StockReduction> {
        let mut reductions: Vec<_> = self
            .store
            .reductions
            .iter()
            .filter(|r| r.outlet_id == outlet_id)
            .collect();
        reductions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reductions
    }
}

/// A reduction about to be applied
pub(crate) struct Reduction {
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub quantity: Decimal,
    pub reason: ReductionReason,
    pub notes: Option<String>,
    pub reference_order_id: Option<Uuid>,
}

/// Draw `quantity` down from the pair's lots and append the reduction record.
///
/// Lots are drained in consumption order and never pushed below zero. Any
/// quantity left over once every lot is empty is recorded as absorbed.
pub(crate) fn apply_reduction(
    store: &mut EntityStore,
    reduction: Reduction,
    actor: &Actor,
) -> StockReduction {
    let mut indices: Vec<usize> = store
        .lots
        .iter()
        .enumerate()
        .filter(|(_, lot)| {
            lot.product_id == reduction.product_id
                && lot.outlet_id == reduction.outlet_id
                && !lot.is_empty()
        })
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| consumption_order(&store.lots[a], &store.lots[b]));

    let mut remaining = reduction.quantity;
    for i in indices {
        if remaining.is_zero() {
            break;
        }
        remaining -= store.lots[i].take(remaining);
    }

    if remaining > Decimal::ZERO {
        tracing::warn!(
            product = store.product_name(reduction.product_id),
            outlet = store.outlet_name(reduction.outlet_id),
            requested = %reduction.quantity,
            absorbed = %remaining,
            "Reduction exceeded available stock, clamped at zero"
        );
    }

    let record = StockReduction {
        id: Uuid::new_v4(),
        product_id: reduction.product_id,
        outlet_id: reduction.outlet_id,
        quantity: reduction.quantity,
        absorbed: remaining,
        reason: reduction.reason,
        notes: reduction.notes,
        reference_order_id: reduction.reference_order_id,
        created_by: actor.clone(),
        created_at: Utc::now(),
    };

    tracing::info!(
        reduction_id = %record.id,
        product = store.product_name(record.product_id),
        quantity = %record.quantity,
        reason = %record.reason,
        "Recorded stock reduction"
    );

    store.reductions.push(record.clone());
    record
}

/// Append a lot that puts stock back for a deleted order
pub(crate) fn restore_lot(
    store: &mut EntityStore,
    product_id: Uuid,
    outlet_id: Uuid,
    quantity: Decimal,
    order_id: Uuid,
    actor: &Actor,
) -> InventoryItem {
    let supplier_id = store.product(product_id).and_then(|p| p.default_supplier_id);

    let lot = InventoryItem {
        id: Uuid::new_v4(),
        product_id,
        outlet_id,
        received_quantity: quantity,
        quantity,
        expiry_date: None,
        supplier_id,
        source: InventorySource::OrderRestoration,
        batch_number: None,
        purchase_price: None,
        reference_order_id: Some(order_id),
        created_by: actor.clone(),
        created_at: Utc::now(),
    };

    tracing::debug!(
        lot_id = %lot.id,
        product = store.product_name(product_id),
        quantity = %quantity,
        order_id = %order_id,
        "Restored ingredient stock"
    );

    store.lots.push(lot.clone());
    lot
}
