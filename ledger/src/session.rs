//! Session state
//!
//! The session owns the entity store together with the configuration, the
//! acting user and the selected outlet. Services borrow the store from here
//! for the duration of one action.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use shared::{
    decode_selected_outlet, decode_thresholds, encode_selected_outlet, encode_thresholds, Actor,
};

use crate::config::Config;
use crate::error::{AppError, AppResult, ErrorDetail};
use crate::services::{
    AuditService, CatalogService, InventoryService, OrderService, ReportingService,
    ThresholdService,
};
use crate::store::EntityStore;

/// Top-level state for one user session
pub struct Session {
    config: Arc<Config>,
    store: EntityStore,
    actor: Actor,
    selected_outlet: Option<Uuid>,
}

impl Session {
    pub fn new(config: Config, actor: Actor) -> Self {
        Self::with_store(config, actor, EntityStore::new())
    }

    pub fn with_store(config: Config, actor: Actor, store: EntityStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            actor,
            selected_outlet: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn into_store(self) -> EntityStore {
        self.store
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Today's date for status classification
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn selected_outlet(&self) -> Option<Uuid> {
        self.selected_outlet
    }

    /// Select an outlet; `None` clears the selection
    pub fn select_outlet(&mut self, outlet_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = outlet_id {
            if self.store.outlet(id).is_none() {
                return Err(AppError::NotFound("Outlet".to_string()));
            }
        }
        self.selected_outlet = outlet_id;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------------

    pub fn catalog(&mut self) -> CatalogService<'_> {
        CatalogService::new(&mut self.store)
    }

    pub fn inventory(&mut self) -> InventoryService<'_> {
        InventoryService::new(&mut self.store, &self.actor)
    }

    pub fn thresholds(&mut self) -> ThresholdService<'_> {
        ThresholdService::new(&mut self.store)
    }

    pub fn orders(&mut self) -> OrderService<'_> {
        OrderService::new(&mut self.store, &self.actor)
    }

    pub fn audit(&self) -> AuditService<'_> {
        AuditService::new(&self.store)
    }

    /// Reports as of `today`
    pub fn reports_on(&self, today: NaiveDate) -> ReportingService<'_> {
        ReportingService::new(&self.store, self.config.stock.windows(), today)
    }

    pub fn reports(&self) -> ReportingService<'_> {
        self.reports_on(self.today())
    }

    // ------------------------------------------------------------------------
    // Persisted blobs
    // ------------------------------------------------------------------------

    /// Replace thresholds from a stored `lowStockThresholds` blob
    pub fn restore_thresholds(&mut self, raw: &str) -> AppResult<usize> {
        let thresholds = decode_thresholds(raw)?;
        let count = thresholds.len();
        self.thresholds().replace_all(thresholds);
        Ok(count)
    }

    /// Current thresholds as a `lowStockThresholds` blob
    pub fn thresholds_blob(&self) -> AppResult<String> {
        Ok(encode_thresholds(self.store.thresholds())?)
    }

    /// Restore the selection from a stored `selectedOutlet` blob.
    ///
    /// A stored outlet that no longer exists clears the selection.
    pub fn restore_selected_outlet(&mut self, raw: &str) -> AppResult<Option<Uuid>> {
        let outlet_id = decode_selected_outlet(raw)?;
        match outlet_id {
            Some(id) if self.store.outlet(id).is_none() => {
                tracing::warn!(
                    outlet_id = %id,
                    "Stored outlet no longer exists; clearing selection"
                );
                self.selected_outlet = None;
            }
            _ => self.selected_outlet = outlet_id,
        }
        Ok(self.selected_outlet)
    }

    pub fn selected_outlet_blob(&self) -> AppResult<String> {
        Ok(encode_selected_outlet(self.selected_outlet)?)
    }

    /// Restore whichever blobs are present, keeping going past unreadable ones.
    ///
    /// A blob that fails to decode leaves its part of the session untouched
    /// and is reported back as an [`ErrorDetail`].
    pub fn restore_persisted(
        &mut self,
        thresholds: Option<&str>,
        selected_outlet: Option<&str>,
    ) -> Vec<ErrorDetail> {
        let mut problems = Vec::new();

        if let Some(raw) = thresholds {
            match self.restore_thresholds(raw) {
                Ok(count) => tracing::info!(count, "Restored low-stock thresholds"),
                Err(err) => problems.push(err.detail()),
            }
        }
        if let Some(raw) = selected_outlet {
            if let Err(err) = self.restore_selected_outlet(raw) {
                problems.push(err.detail());
            }
        }

        problems
    }
}
