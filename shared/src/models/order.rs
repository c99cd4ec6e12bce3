//! Manual order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::MenuItem;
use crate::types::Actor;

/// An order entered by staff.
///
/// Orders carry no status: creating one consumes its ingredients
/// immediately and deleting one restores them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualOrder {
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub source: OrderSource,
    pub customer: Option<CustomerInfo>,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

/// One menu item and how many plates of it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub menu_item_id: Uuid,
    pub quantity: u32,
}

/// Channel the order came in through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    WalkIn,
    Phone,
    OnlineAggregator,
    Other,
}

impl std::fmt::Display for OrderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSource::WalkIn => write!(f, "Walk-in"),
            OrderSource::Phone => write!(f, "Phone"),
            OrderSource::OnlineAggregator => write!(f, "Online Aggregator"),
            OrderSource::Other => write!(f, "Other"),
        }
    }
}

/// Optional customer details captured with an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CustomerInfo {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
}

/// Menu price of the lines; unknown menu items count as zero.
/// Saturates at `Decimal::MAX` rather than overflowing.
pub fn order_total(lines: &[OrderLine], menu: &[MenuItem]) -> Decimal {
    lines
        .iter()
        .filter_map(|line| {
            menu.iter()
                .find(|m| m.id == line.menu_item_id)
                .map(|m| m.cost_per_plate.saturating_mul(Decimal::from(line.quantity)))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
