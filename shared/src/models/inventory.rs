//! Inventory lot and stock reduction models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Actor;

/// One received batch of a product at an outlet.
///
/// `quantity` only ever moves toward zero after receipt and never goes
/// negative. Lots are never deleted, an emptied lot stays at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    /// Quantity on receipt, never changes
    pub received_quantity: Decimal,
    /// Quantity still on hand
    pub quantity: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    pub source: InventorySource,
    pub batch_number: Option<String>,
    /// Price paid per unit
    pub purchase_price: Option<Decimal>,
    /// Order whose deletion produced this lot
    pub reference_order_id: Option<Uuid>,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_empty(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }

    /// Remove up to `requested` from this lot, returning what was taken
    pub fn take(&mut self, requested: Decimal) -> Decimal {
        let taken = requested.min(self.quantity).max(Decimal::ZERO);
        self.quantity -= taken;
        taken
    }

    /// Purchase value of what is left in the lot
    pub fn value(&self) -> Option<Decimal> {
        self.purchase_price.map(|price| price.saturating_mul(self.quantity))
    }
}

/// Where a lot came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InventorySource {
    Purchase,
    Transfer,
    ManualAdjustment,
    /// Ingredients added back when a manual order is deleted
    OrderRestoration,
}

impl std::fmt::Display for InventorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventorySource::Purchase => write!(f, "Purchase"),
            InventorySource::Transfer => write!(f, "Transfer"),
            InventorySource::ManualAdjustment => write!(f, "Manual Adjustment"),
            InventorySource::OrderRestoration => write!(f, "Order Restoration"),
        }
    }
}

/// Append-only record of stock leaving an outlet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockReduction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    /// Quantity the caller asked to remove
    pub quantity: Decimal,
    /// Part of `quantity` that exceeded available stock and was dropped
    pub absorbed: Decimal,
    pub reason: ReductionReason,
    pub notes: Option<String>,
    pub reference_order_id: Option<Uuid>,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

impl StockReduction {
    /// Quantity actually taken out of lots
    pub fn applied(&self) -> Decimal {
        self.quantity - self.absorbed
    }
}

/// Why stock was reduced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReductionReason {
    Sold,
    Spoilage,
    Theft,
    Other,
}

impl std::fmt::Display for ReductionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionReason::Sold => write!(f, "Sold"),
            ReductionReason::Spoilage => write!(f, "Spoilage"),
            ReductionReason::Theft => write!(f, "Theft"),
            ReductionReason::Other => write!(f, "Other"),
        }
    }
}

/// Sum lot quantities for a (product, outlet) pair.
///
/// Snapshots are loaded without re-validation, so the sum saturates at
/// `Decimal::MAX` instead of overflowing.
pub fn aggregate_stock<'a, I>(lots: I, product_id: Uuid, outlet_id: Uuid) -> Decimal
where
    I: IntoIterator<Item = &'a InventoryItem>,
{
    lots.into_iter()
        .filter(|lot| lot.product_id == product_id && lot.outlet_id == outlet_id)
        .map(|lot| lot.quantity)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Order in which lots are drawn down: earliest expiry first, lots without
/// an expiry date last, ties broken by receipt time.
pub fn consumption_order(a: &InventoryItem, b: &InventoryItem) -> std::cmp::Ordering {
    match (a.expiry_date, b.expiry_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then(a.created_at.cmp(&b.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lot(quantity: i64, expiry: Option<NaiveDate>, minute: u32) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            outlet_id: Uuid::nil(),
            received_quantity: Decimal::from(quantity),
            quantity: Decimal::from(quantity),
            expiry_date: expiry,
            supplier_id: None,
            source: InventorySource::Purchase,
            batch_number: None,
            purchase_price: None,
            reference_order_id: None,
            created_by: Actor::system(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_take_clamps_at_zero() {
        let mut item = lot(10, None, 0);
        let taken = item.take(Decimal::from(15));
        assert_eq!(taken, Decimal::from(10));
        assert_eq!(item.quantity, Decimal::ZERO);
        assert!(item.is_empty());
    }

    #[test]
    fn test_take_partial() {
        let mut item = lot(10, None, 0);
        assert_eq!(item.take(Decimal::from(4)), Decimal::from(4));
        assert_eq!(item.quantity, Decimal::from(6));
    }

    #[test]
    fn test_aggregate_stock_filters_pair() {
        let product = Uuid::new_v4();
        let outlet = Uuid::new_v4();
        let mut a = lot(3, None, 0);
        a.product_id = product;
        a.outlet_id = outlet;
        let mut b = lot(4, None, 1);
        b.product_id = product;
        b.outlet_id = outlet;
        let other_outlet = lot(100, None, 2);

        let lots = vec![a, b, other_outlet];
        assert_eq!(aggregate_stock(&lots, product, outlet), Decimal::from(7));
        assert_eq!(aggregate_stock(&lots, Uuid::new_v4(), outlet), Decimal::ZERO);
    }

    #[test]
    fn test_consumption_order_prefers_earliest_expiry() {
        let early = lot(1, NaiveDate::from_ymd_opt(2024, 6, 3), 5);
        let late = lot(1, NaiveDate::from_ymd_opt(2024, 6, 9), 0);
        let none = lot(1, None, 0);

        let mut lots = vec![none.clone(), late.clone(), early.clone()];
        lots.sort_by(consumption_order);
        assert_eq!(lots[0].id, early.id);
        assert_eq!(lots[1].id, late.id);
        assert_eq!(lots[2].id, none.id);
    }

    #[test]
    fn test_aggregate_stock_saturates() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let mut a = lot(0, None, 0);
        a.quantity = huge;
        let mut b = lot(0, None, 1);
        b.quantity = huge;

        let lots = vec![a, b];
        assert_eq!(aggregate_stock(&lots, Uuid::nil(), Uuid::nil()), Decimal::MAX);
    }

    #[test]
    fn test_lot_value() {
        let mut item = lot(4, None, 0);
        assert_eq!(item.value(), None);
        item.purchase_price = Some(Decimal::new(250, 2));
        assert_eq!(item.value(), Some(Decimal::from(10)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_take_never_overdraws(start in 0i64..10_000, requested in 0i64..20_000) {
                let mut item = lot(0, None, 0);
                item.quantity = Decimal::new(start, 2);
                let taken = item.take(Decimal::new(requested, 2));

                prop_assert!(item.quantity >= Decimal::ZERO);
                prop_assert!(taken <= Decimal::new(requested, 2));
                prop_assert_eq!(item.quantity + taken, Decimal::new(start, 2));
            }
        }
    }
}
