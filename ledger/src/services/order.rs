//! Manual order service
//!
//! Creating an order consumes every recipe ingredient from the outlet's stock
//! straight away; deleting one puts back exactly what the order's reductions
//! asked for, as new lots. The reductions made at creation stay in the log
//! either way.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::{
    check_requirements, expand_recipes, order_total, validate_order_lines, Actor, CustomerInfo,
    ManualOrder, OrderLine, OrderSource, ReductionReason, RequirementReport,
};

use crate::error::{AppError, AppResult};
use crate::services::inventory::{apply_reduction, restore_lot, Reduction};
use crate::store::EntityStore;

/// Order service over the session's store
pub struct OrderService<'a> {
    store: &'a mut EntityStore,
    actor: &'a Actor,
}

/// Input for creating a manual order
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    pub outlet_id: Uuid,
    pub source: OrderSource,
    pub customer: Option<CustomerInfo>,
    pub items: Vec<OrderLine>,
    /// Defaults to the menu price of the items
    pub total_amount: Option<Decimal>,
}

/// One ingredient draw for one order line
#[derive(Debug, Clone, Copy, PartialEq)]
struct IngredientDraw {
    product_id: Uuid,
    quantity: Decimal,
}

impl<'a> OrderService<'a> {
    pub fn new(store: &'a mut EntityStore, actor: &'a Actor) -> Self {
        Self { store, actor }
    }

    /// Advisory check of what the lines need against stock at the outlet.
    /// Never blocks order creation.
    pub fn check_requirements(&self, outlet_id: Uuid, lines: &[OrderLine]) -> RequirementReport {
        let expansion = expand_recipes(lines, &self.store.menu_items);
        let report = check_requirements(&expansion, |product_id| {
            self.store.current_stock(product_id, outlet_id)
        });

        tracing::debug!(
            outlet = self.store.outlet_name(outlet_id),
            products = report.items.len(),
            sufficient = report.all_sufficient(),
            "Checked order requirements"
        );
        report
    }

    /// Create an order and consume its ingredients
    pub fn create_order(&mut self, input: CreateOrderInput) -> AppResult<ManualOrder> {
        validate_order_lines(&input.items).map_err(|m| AppError::validation("items", m))?;
        if let Some(customer) = &input.customer {
            customer.validate()?;
        }
        if let Some(total) = input.total_amount {
            if total < Decimal::ZERO {
                return Err(AppError::validation(
                    "total_amount",
                    "Total amount cannot be negative",
                ));
            }
        }
        if self.store.outlet(input.outlet_id).is_none() {
            return Err(AppError::NotFound("Outlet".to_string()));
        }

        // Expand every line before touching stock
        let draws = self.ingredient_draws(&input.items);
        let total_amount = input
            .total_amount
            .unwrap_or_else(|| order_total(&input.items, &self.store.menu_items));

        let order = ManualOrder {
            id: Uuid::new_v4(),
            outlet_id: input.outlet_id,
            source: input.source,
            customer: input.customer,
            items: input.items,
            total_amount,
            created_by: self.actor.clone(),
            created_at: Utc::now(),
        };

        for draw in draws {
            apply_reduction(
                self.store,
                Reduction {
                    product_id: draw.product_id,
                    outlet_id: order.outlet_id,
                    quantity: draw.quantity,
                    reason: ReductionReason::Sold,
                    notes: None,
                    reference_order_id: Some(order.id),
                },
                self.actor,
            );
        }

        tracing::info!(
            order_id = %order.id,
            outlet = self.store.outlet_name(order.outlet_id),
            lines = order.items.len(),
            total = %order.total_amount,
            "Created manual order"
        );

        self.store.orders.push(order.clone());
        Ok(order)
    }

    /// Delete an order and restore its ingredients as new lots.
    ///
    /// One lot per `Sold` reduction the order recorded, for the quantity that
    /// reduction requested, so later recipe edits or menu deletions do not
    /// change what comes back.
    pub fn delete_order(&mut self, order_id: Uuid) -> AppResult<ManualOrder> {
        let position = self
            .store
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let order = self.store.orders.remove(position);
        let draws: Vec<IngredientDraw> = self
            .store
            .reductions
            .iter()
            .filter(|r| r.reference_order_id == Some(order.id))
            .filter(|r| r.reason == ReductionReason::Sold)
            .map(|r| IngredientDraw {
                product_id: r.product_id,
                quantity: r.quantity,
            })
            .collect();

        for draw in draws {
            restore_lot(
                self.store,
                draw.product_id,
                order.outlet_id,
                draw.quantity,
                order.id,
                self.actor,
            );
        }

        tracing::info!(
            order_id = %order.id,
            outlet = self.store.outlet_name(order.outlet_id),
            "Deleted manual order and restored ingredients"
        );

        Ok(order)
    }

    /// Orders, optionally for one outlet, newest first
    pub fn list_orders(&self, outlet_id: Option<Uuid>) -> Vec<&ManualOrder> {
        let mut orders: Vec<_> = self
            .store
            .orders
            .iter()
            .filter(|o| outlet_id.map_or(true, |id| o.outlet_id == id))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub fn get_order(&self, order_id: Uuid) -> AppResult<&ManualOrder> {
        self.store
            .order(order_id)
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// One draw per (line, ingredient); lines naming unknown menu items draw nothing
    fn ingredient_draws(&self, lines: &[OrderLine]) -> Vec<IngredientDraw> {
        let mut draws = Vec::new();
        for line in lines {
            let Some(item) = self.store.menu_item(line.menu_item_id) else {
                tracing::warn!(
                    menu_item_id = %line.menu_item_id,
                    "Order line references unknown menu item; no stock moved"
                );
                continue;
            };

            let plates = Decimal::from(line.quantity);
            draws.extend(item.ingredients.iter().map(|ingredient| IngredientDraw {
                product_id: ingredient.product_id,
                quantity: ingredient.quantity_per_plate.saturating_mul(plates),
            }));
        }
        draws
    }
}
