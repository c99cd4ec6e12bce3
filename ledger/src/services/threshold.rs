//! Low-stock threshold management

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{validate_threshold_minimum, LowStockThreshold};

use crate::error::{AppError, AppResult};
use crate::store::EntityStore;

/// Threshold service over the session's store
pub struct ThresholdService<'a> {
    store: &'a mut EntityStore,
}

/// Input for creating a threshold
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThresholdInput {
    pub product_id: Uuid,
    pub outlet_id: Uuid,
    pub min_quantity: Decimal,
    pub reason: Option<String>,
}

/// Input for updating a threshold
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateThresholdInput {
    pub min_quantity: Option<Decimal>,
    pub reason: Option<String>,
}

/// A threshold whose pair is at or below its minimum
#[derive(Debug, Clone, Serialize)]
pub struct TriggeredThreshold {
    pub threshold: LowStockThreshold,
    pub product_name: String,
    pub outlet_name: String,
    pub current_stock: Decimal,
}

impl<'a> ThresholdService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    /// Create a threshold. A second threshold for the same pair is accepted
    /// but shadowed by the first in every lookup.
    pub fn create(&mut self, input: CreateThresholdInput) -> AppResult<LowStockThreshold> {
        validate_threshold_minimum(input.min_quantity)
            .map_err(|m| AppError::validation("min_quantity", m))?;

        if self.store.threshold_for(input.product_id, input.outlet_id).is_some() {
            tracing::warn!(
                product = self.store.product_name(input.product_id),
                outlet = self.store.outlet_name(input.outlet_id),
                "Duplicate threshold for pair; the earlier one stays in effect"
            );
        }

        let threshold = LowStockThreshold {
            id: Uuid::new_v4(),
            product_id: input.product_id,
            outlet_id: input.outlet_id,
            min_quantity: input.min_quantity,
            reason: input.reason.filter(|r| !r.trim().is_empty()),
        };

        tracing::info!(
            threshold_id = %threshold.id,
            product = self.store.product_name(threshold.product_id),
            min_quantity = %threshold.min_quantity,
            "Created low-stock threshold"
        );

        self.store.thresholds.push(threshold.clone());
        Ok(threshold)
    }

    /// Update a threshold
    pub fn update(
        &mut self,
        threshold_id: Uuid,
        input: UpdateThresholdInput,
    ) -> AppResult<LowStockThreshold> {
        if let Some(min) = input.min_quantity {
            validate_threshold_minimum(min).map_err(|m| AppError::validation("min_quantity", m))?;
        }

        let threshold = self
            .store
            .thresholds
            .iter_mut()
            .find(|t| t.id == threshold_id)
            .ok_or_else(|| AppError::NotFound("Threshold".to_string()))?;

        if let Some(min) = input.min_quantity {
            threshold.min_quantity = min;
        }
        if let Some(reason) = input.reason {
            threshold.reason = Some(reason).filter(|r| !r.trim().is_empty());
        }

        Ok(threshold.clone())
    }

    /// Delete a threshold
    pub fn delete(&mut self, threshold_id: Uuid) -> AppResult<()> {
        let before = self.store.thresholds.len();
        self.store.thresholds.retain(|t| t.id != threshold_id);

        if self.store.thresholds.len() == before {
            return Err(AppError::NotFound("Threshold".to_string()));
        }
        Ok(())
    }

    /// Thresholds, optionally for one outlet
    pub fn list(&self, outlet_id: Option<Uuid>) -> Vec<&LowStockThreshold> {
        self.store
            .thresholds
            .iter()
            .filter(|t| outlet_id.map_or(true, |id| t.outlet_id == id))
            .collect()
    }

    /// Threshold in effect for the pair
    pub fn find(&self, product_id: Uuid, outlet_id: Uuid) -> Option<&LowStockThreshold> {
        self.store.threshold_for(product_id, outlet_id)
    }

    /// Thresholds currently tripped, optionally for one outlet.
    ///
    /// Shadowed duplicates are skipped so each pair is reported once.
    pub fn triggered(&self, outlet_id: Option<Uuid>) -> Vec<TriggeredThreshold> {
        self.list(outlet_id)
            .into_iter()
            .filter(|t| {
                self.store
                    .threshold_for(t.product_id, t.outlet_id)
                    .is_some_and(|first| first.id == t.id)
            })
            .filter_map(|t| {
                let current_stock = self.store.current_stock(t.product_id, t.outlet_id);
                t.is_triggered_by(current_stock).then(|| TriggeredThreshold {
                    threshold: t.clone(),
                    product_name: self.store.product_name(t.product_id).to_string(),
                    outlet_name: self.store.outlet_name(t.outlet_id).to_string(),
                    current_stock,
                })
            })
            .collect()
    }

    /// Replace every threshold, as when loading the persisted blob
    pub fn replace_all(&mut self, thresholds: Vec<LowStockThreshold>) {
        tracing::info!(count = thresholds.len(), "Replaced low-stock thresholds");
        self.store.thresholds = thresholds;
    }
}
