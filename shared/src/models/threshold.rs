//! Low-stock threshold models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum acceptable stock for a (product, outlet) pair.
///
/// Nothing enforces one threshold per pair. Lookups take the first match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockThreshold {
    pub id: Uuid,
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub min_quantity: Decimal,
    pub reason: Option<String>,
}

impl LowStockThreshold {
    pub fn matches(&self, product_id: Uuid, outlet_id: Uuid) -> bool {
        self.product_id == product_id && self.outlet_id == outlet_id
    }

    /// Stock at or below the minimum trips the threshold
    pub fn is_triggered_by(&self, stock: Decimal) -> bool {
        stock <= self.min_quantity
    }
}

/// First threshold registered for the pair
pub fn find_threshold<'a, I>(
    thresholds: I,
    product_id: Uuid,
    outlet_id: Uuid,
) -> Option<&'a LowStockThreshold>
where
    I: IntoIterator<Item = &'a LowStockThreshold>,
{
    thresholds
        .into_iter()
        .find(|t| t.matches(product_id, outlet_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(product_id: Uuid, outlet_id: Uuid, min: i64) -> LowStockThreshold {
        LowStockThreshold {
            id: Uuid::new_v4(),
            product_id,
            outlet_id,
            min_quantity: Decimal::from(min),
            reason: None,
        }
    }

    #[test]
    fn test_find_threshold_first_match_wins() {
        let product = Uuid::new_v4();
        let outlet = Uuid::new_v4();
        let thresholds = vec![
            threshold(product, Uuid::new_v4(), 1),
            threshold(product, outlet, 5),
            threshold(product, outlet, 50),
        ];

        let found = find_threshold(&thresholds, product, outlet).unwrap();
        assert_eq!(found.min_quantity, Decimal::from(5));
    }

    #[test]
    fn test_find_threshold_missing() {
        let thresholds: Vec<LowStockThreshold> = vec![];
        assert!(find_threshold(&thresholds, Uuid::new_v4(), Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_triggered_inclusive() {
        let t = threshold(Uuid::new_v4(), Uuid::new_v4(), 5);
        assert!(t.is_triggered_by(Decimal::from(5)));
        assert!(t.is_triggered_by(Decimal::ZERO));
        assert!(!t.is_triggered_by(Decimal::new(51, 1)));
    }
}
