//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use restaurant_inventory_ledger::services::catalog::{
    MenuItemInput, OutletInput, ProductInput, SupplierInput,
};
use restaurant_inventory_ledger::services::inventory::ReceiveLotInput;
use restaurant_inventory_ledger::{Config, Session};
use shared::{Actor, InventoryItem, RecipeIngredient, SupplierContact, UnitOfMeasure};

/// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A session with two outlets, one supplier and three products
pub struct Fixture {
    pub session: Session,
    pub outlet: Uuid,
    pub other_outlet: Uuid,
    pub supplier: Uuid,
    pub rice: Uuid,
    pub paneer: Uuid,
    pub onion: Uuid,
}

pub fn fixture() -> Fixture {
    let mut session = Session::new(
        Config::default(),
        Actor::new(Uuid::new_v4(), "Priya (store manager)"),
    );

    let mut catalog = session.catalog();
    let outlet = catalog
        .create_outlet(OutletInput {
            name: "Indiranagar".to_string(),
            location: Some("100 Feet Road".to_string()),
            is_active: None,
        })
        .unwrap()
        .id;
    let other_outlet = catalog
        .create_outlet(OutletInput {
            name: "Koramangala".to_string(),
            location: None,
            is_active: None,
        })
        .unwrap()
        .id;
    let supplier = catalog
        .create_supplier(SupplierInput {
            name: "Fresh Farms".to_string(),
            contact: SupplierContact {
                contact_person: Some("Ravi".to_string()),
                phone: Some("+91 98450 12345".to_string()),
                email: Some("orders@freshfarms.in".to_string()),
                address: None,
            },
        })
        .unwrap()
        .id;

    let mut product = |name: &str, unit: UnitOfMeasure, perishable: bool| {
        catalog
            .create_product(ProductInput {
                name: name.to_string(),
                category: "Ingredients".to_string(),
                unit,
                is_perishable: perishable,
                default_supplier_id: Some(supplier),
            })
            .unwrap()
            .id
    };
    let rice = product("Basmati Rice", UnitOfMeasure::Kilogram, false);
    let paneer = product("Paneer", UnitOfMeasure::Kilogram, true);
    let onion = product("Onion", UnitOfMeasure::Kilogram, true);

    Fixture {
        session,
        outlet,
        other_outlet,
        supplier,
        rice,
        paneer,
        onion,
    }
}

impl Fixture {
    pub fn receive(
        &mut self,
        product_id: Uuid,
        quantity: &str,
        expiry: Option<NaiveDate>,
    ) -> InventoryItem {
        let outlet_id = self.outlet;
        self.receive_at(product_id, outlet_id, quantity, expiry)
    }

    pub fn receive_at(
        &mut self,
        product_id: Uuid,
        outlet_id: Uuid,
        quantity: &str,
        expiry: Option<NaiveDate>,
    ) -> InventoryItem {
        self.session
            .inventory()
            .receive_lot(ReceiveLotInput {
                product_id,
                outlet_id,
                quantity: dec(quantity),
                expiry_date: expiry,
                supplier_id: None,
                source: None,
                batch_number: None,
                purchase_price: None,
            })
            .unwrap()
    }

    pub fn stock(&self, product_id: Uuid) -> Decimal {
        self.session.store().current_stock(product_id, self.outlet)
    }

    /// Menu item built from (product, quantity per plate) pairs
    pub fn menu_item(&mut self, name: &str, recipe: &[(Uuid, &str)]) -> Uuid {
        self.session
            .catalog()
            .create_menu_item(MenuItemInput {
                name: name.to_string(),
                cost_per_plate: dec("220.00"),
                ingredients: recipe
                    .iter()
                    .map(|&(product_id, qty)| RecipeIngredient {
                        product_id,
                        quantity_per_plate: dec(qty),
                    })
                    .collect(),
            })
            .unwrap()
            .id
    }
}
