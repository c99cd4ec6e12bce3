//! Menu items, recipes and ingredient requirement derivation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderLine;

/// A dish on the menu and the recipe it consumes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub cost_per_plate: Decimal,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Quantity of one product used per plate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub product_id: Uuid,
    pub quantity_per_plate: Decimal,
}

/// Per-product totals needed to fulfil a set of order lines
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeExpansion {
    /// Products in the order they first appear across the lines
    pub requirements: Vec<(Uuid, Decimal)>,
    /// Menu items referenced by a line but missing from the menu
    pub unknown_menu_items: Vec<Uuid>,
}

impl RecipeExpansion {
    pub fn required(&self, product_id: Uuid) -> Decimal {
        self.requirements
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, qty)| *qty)
            .unwrap_or(Decimal::ZERO)
    }

    fn add(&mut self, product_id: Uuid, quantity: Decimal) {
        match self.requirements.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => self.requirements.push((product_id, quantity)),
        }
    }
}

/// Expand order lines through their recipes, summing per product across lines
pub fn expand_recipes(lines: &[OrderLine], menu: &[MenuItem]) -> RecipeExpansion {
    let mut expansion = RecipeExpansion::default();

    for line in lines {
        let Some(item) = menu.iter().find(|m| m.id == line.menu_item_id) else {
            if !expansion.unknown_menu_items.contains(&line.menu_item_id) {
                expansion.unknown_menu_items.push(line.menu_item_id);
            }
            continue;
        };

        let plates = Decimal::from(line.quantity);
        for ingredient in &item.ingredients {
            expansion.add(
                ingredient.product_id,
                ingredient.quantity_per_plate.saturating_mul(plates),
            );
        }
    }

    expansion
}

/// Requirement for one product against what is on hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientRequirement {
    pub product_id: Uuid,
    pub required: Decimal,
    pub available: Decimal,
    pub shortfall: Decimal,
    pub sufficient: bool,
}

/// Advisory sufficiency report for a prospective order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequirementReport {
    pub items: Vec<IngredientRequirement>,
    pub unknown_menu_items: Vec<Uuid>,
}

impl RequirementReport {
    pub fn all_sufficient(&self) -> bool {
        self.items.iter().all(|item| item.sufficient)
    }

    pub fn insufficient(&self) -> impl Iterator<Item = &IngredientRequirement> {
        self.items.iter().filter(|item| !item.sufficient)
    }
}

/// Compare each expanded requirement with current stock
pub fn check_requirements<F>(expansion: &RecipeExpansion, mut available: F) -> RequirementReport
where
    F: FnMut(Uuid) -> Decimal,
{
    let items = expansion
        .requirements
        .iter()
        .map(|&(product_id, required)| {
            let available = available(product_id);
            let shortfall = (required - available).max(Decimal::ZERO);
            IngredientRequirement {
                product_id,
                required,
                available,
                shortfall,
                sufficient: shortfall.is_zero(),
            }
        })
        .collect();

    RequirementReport {
        items,
        unknown_menu_items: expansion.unknown_menu_items.clone(),
    }
}
