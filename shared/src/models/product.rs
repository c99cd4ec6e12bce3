//! Product catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stocked product (raw ingredient or packaged good)
///
/// Products are never edited field by field; an update replaces the whole
/// record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: UnitOfMeasure,
    pub is_perishable: bool,
    pub default_supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Unit a product is counted in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kilogram,
    Gram,
    Litre,
    Millilitre,
    Piece,
    Packet,
    Dozen,
}

impl UnitOfMeasure {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Gram => "g",
            UnitOfMeasure::Litre => "l",
            UnitOfMeasure::Millilitre => "ml",
            UnitOfMeasure::Piece => "pcs",
            UnitOfMeasure::Packet => "pkt",
            UnitOfMeasure::Dozen => "dozen",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
