//! Stock movement history
//!
//! Lots and reductions are both append-only, so the history is rebuilt from
//! them on demand. A deleted order leaves its reductions in place and adds
//! restoration lots; the pair is never netted out.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::{DateRange, InventorySource, ReductionReason};

use crate::store::EntityStore;

/// Read-only audit queries over the store
pub struct AuditService<'a> {
    store: &'a EntityStore,
}

/// Direction and cause of a movement
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "cause", rename_all = "snake_case")]
pub enum MovementKind {
    Received(InventorySource),
    Reduced(ReductionReason),
}

/// One entry in a movement history
#[derive(Debug, Clone, Serialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub kind: MovementKind,
    /// Positive for stock in, negative for stock out
    pub quantity: Decimal,
    /// Part of a reduction dropped by the zero clamp
    pub absorbed: Decimal,
    pub reference_order_id: Option<Uuid>,
    pub actor_name: String,
}

/// Received versus reduced totals for a pair
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerBalance {
    pub received: Decimal,
    pub reduced: Decimal,
    pub absorbed: Decimal,
    pub on_hand: Decimal,
}

impl LedgerBalance {
    /// On-hand stock equals everything received minus what reductions took
    pub fn is_consistent(&self) -> bool {
        self.received - self.reduced == self.on_hand
    }
}

impl<'a> AuditService<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// Chronological history for a pair, optionally limited to a date range
    pub fn movements(
        &self,
        product_id: Uuid,
        outlet_id: Uuid,
        range: Option<&DateRange>,
    ) -> Vec<StockMovement> {
        self.collect(|p, o, _| p == product_id && o == outlet_id, range)
    }

    /// Everything an order moved: its reductions and any restoration lots
    pub fn order_movements(&self, order_id: Uuid) -> Vec<StockMovement> {
        self.collect(|_, _, reference| reference == Some(order_id), None)
    }

    /// Totals for a pair; `is_consistent` should hold for any store built
    /// through the services
    pub fn balance(&self, product_id: Uuid, outlet_id: Uuid) -> LedgerBalance {
        let lots = self
            .store
            .lots()
            .iter()
            .filter(|l| l.product_id == product_id && l.outlet_id == outlet_id);
        let reductions = self
            .store
            .reductions()
            .iter()
            .filter(|r| r.product_id == product_id && r.outlet_id == outlet_id);

        let (received, on_hand) = lots.fold((Decimal::ZERO, Decimal::ZERO), |(r, h), lot| {
            (
                r.saturating_add(lot.received_quantity),
                h.saturating_add(lot.quantity),
            )
        });
        let (reduced, absorbed) = reductions.fold((Decimal::ZERO, Decimal::ZERO), |(t, a), r| {
            (t.saturating_add(r.applied()), a.saturating_add(r.absorbed))
        });

        LedgerBalance {
            received,
            reduced,
            absorbed,
            on_hand,
        }
    }

    fn collect<F>(&self, wanted: F, range: Option<&DateRange>) -> Vec<StockMovement>
    where
        F: Fn(Uuid, Uuid, Option<Uuid>) -> bool,
    {
        let in_range = |at: DateTime<Utc>| range.map_or(true, |r| r.contains(at.date_naive()));

        let received = self
            .store
            .lots()
            .iter()
            .filter(|l| wanted(l.product_id, l.outlet_id, l.reference_order_id))
            .filter(|l| in_range(l.created_at))
            .map(|l| StockMovement {
                id: l.id,
                at: l.created_at,
                product_id: l.product_id,
                outlet_id: l.outlet_id,
                kind: MovementKind::Received(l.source),
                quantity: l.received_quantity,
                absorbed: Decimal::ZERO,
                reference_order_id: l.reference_order_id,
                actor_name: l.created_by.name.clone(),
            });

        let reduced = self
            .store
            .reductions()
            .iter()
            .filter(|r| wanted(r.product_id, r.outlet_id, r.reference_order_id))
            .filter(|r| in_range(r.created_at))
            .map(|r| StockMovement {
                id: r.id,
                at: r.created_at,
                product_id: r.product_id,
                outlet_id: r.outlet_id,
                kind: MovementKind::Reduced(r.reason),
                quantity: -r.quantity,
                absorbed: r.absorbed,
                reference_order_id: r.reference_order_id,
                actor_name: r.created_by.name.clone(),
            });

        let mut movements: Vec<_> = received.chain(reduced).collect();
        // Lots stay ahead of reductions sharing a timestamp (stable sort)
        movements.sort_by_key(|m| m.at);
        movements
    }
}
