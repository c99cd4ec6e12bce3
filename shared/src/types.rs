//! Common types used across the ledger

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label shown when a product reference cannot be resolved
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
/// Label shown when a supplier reference cannot be resolved
pub const UNKNOWN_SUPPLIER: &str = "Unknown Supplier";
/// Label shown when an outlet reference cannot be resolved
pub const UNKNOWN_OUTLET: &str = "Unknown Outlet";
/// Label shown when a menu item reference cannot be resolved
pub const UNKNOWN_MENU_ITEM: &str = "Unknown Menu Item";

/// The staff member performing an action.
///
/// Identity comes from the surrounding permission service; the ledger only
/// records it on audit entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
}

impl Actor {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Actor used for entries created by the system itself (imports, migrations)
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            name: "system".to_string(),
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    /// Inclusive on both ends
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
