//! Catalog service for outlets, products, suppliers and menu items

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::{
    validate_email, validate_name, validate_phone, validate_purchase_price,
    validate_recipe_quantity, MenuItem, Outlet, Product, RecipeIngredient, Supplier,
    SupplierContact, UnitOfMeasure,
};

use crate::error::{AppError, AppResult};
use crate::store::EntityStore;

/// Catalog service over the session's store
pub struct CatalogService<'a> {
    store: &'a mut EntityStore,
}

/// Input for creating or updating an outlet
#[derive(Debug, Clone, Deserialize)]
pub struct OutletInput {
    pub name: String,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for creating or replacing a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub unit: UnitOfMeasure,
    pub is_perishable: bool,
    pub default_supplier_id: Option<Uuid>,
}

/// Input for creating or replacing a supplier
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub contact: SupplierContact,
}

/// Input for creating or replacing a menu item
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub cost_per_plate: Decimal,
    pub ingredients: Vec<RecipeIngredient>,
}

fn check_name(name: &str) -> AppResult<String> {
    validate_name(name).map_err(|m| AppError::validation("name", m))?;
    Ok(name.trim().to_string())
}

impl<'a> CatalogService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    // ========================================================================
    // Outlets
    // ========================================================================

    pub fn create_outlet(&mut self, input: OutletInput) -> AppResult<Outlet> {
        let outlet = Outlet {
            id: Uuid::new_v4(),
            name: check_name(&input.name)?,
            location: input.location,
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        };

        tracing::info!(outlet_id = %outlet.id, name = %outlet.name, "Created outlet");
        self.store.outlets.push(outlet.clone());
        Ok(outlet)
    }

    pub fn update_outlet(&mut self, outlet_id: Uuid, input: OutletInput) -> AppResult<Outlet> {
        let name = check_name(&input.name)?;
        let outlet = self
            .store
            .outlets
            .iter_mut()
            .find(|o| o.id == outlet_id)
            .ok_or_else(|| AppError::NotFound("Outlet".to_string()))?;

        outlet.name = name;
        outlet.location = input.location;
        if let Some(active) = input.is_active {
            outlet.is_active = active;
        }
        Ok(outlet.clone())
    }

    /// Delete an outlet. Its lots and orders stay and show the placeholder name.
    pub fn delete_outlet(&mut self, outlet_id: Uuid) -> AppResult<()> {
        remove_by_id(&mut self.store.outlets, |o| o.id == outlet_id, "Outlet")
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub fn create_product(&mut self, input: ProductInput) -> AppResult<Product> {
        let product = self.build_product(Uuid::new_v4(), input)?;

        tracing::info!(product_id = %product.id, name = %product.name, "Created product");
        self.store.products.push(product.clone());
        Ok(product)
    }

    /// Replace every field of a product, keeping its id and creation time
    pub fn replace_product(&mut self, product_id: Uuid, input: ProductInput) -> AppResult<Product> {
        let position = self
            .store
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut product = self.build_product(product_id, input)?;
        product.created_at = self.store.products[position].created_at;
        self.store.products[position] = product.clone();
        Ok(product)
    }

    pub fn delete_product(&mut self, product_id: Uuid) -> AppResult<()> {
        remove_by_id(&mut self.store.products, |p| p.id == product_id, "Product")
    }

    fn build_product(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        let name = check_name(&input.name)?;
        validate_name(&input.category).map_err(|m| AppError::validation("category", m))?;
        if let Some(supplier_id) = input.default_supplier_id {
            if self.store.supplier(supplier_id).is_none() {
                return Err(AppError::NotFound("Supplier".to_string()));
            }
        }

        Ok(Product {
            id,
            name,
            category: input.category.trim().to_string(),
            unit: input.unit,
            is_perishable: input.is_perishable,
            default_supplier_id: input.default_supplier_id,
            created_at: Utc::now(),
        })
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    pub fn create_supplier(&mut self, input: SupplierInput) -> AppResult<Supplier> {
        let supplier = build_supplier(Uuid::new_v4(), input)?;

        tracing::info!(supplier_id = %supplier.id, name = %supplier.name, "Created supplier");
        self.store.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn replace_supplier(
        &mut self,
        supplier_id: Uuid,
        input: SupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self
            .store
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier_id)
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let mut supplier = build_supplier(supplier_id, input)?;
        supplier.created_at = existing.created_at;
        *existing = supplier.clone();
        Ok(supplier)
    }

    pub fn delete_supplier(&mut self, supplier_id: Uuid) -> AppResult<()> {
        remove_by_id(&mut self.store.suppliers, |s| s.id == supplier_id, "Supplier")
    }

    // ========================================================================
    // Menu items
    // ========================================================================

    pub fn create_menu_item(&mut self, input: MenuItemInput) -> AppResult<MenuItem> {
        let item = self.build_menu_item(Uuid::new_v4(), input)?;

        tracing::info!(
            menu_item_id = %item.id,
            name = %item.name,
            ingredients = item.ingredients.len(),
            "Created menu item"
        );
        self.store.menu_items.push(item.clone());
        Ok(item)
    }

    pub fn replace_menu_item(
        &mut self,
        menu_item_id: Uuid,
        input: MenuItemInput,
    ) -> AppResult<MenuItem> {
        let position = self
            .store
            .menu_items
            .iter()
            .position(|m| m.id == menu_item_id)
            .ok_or_else(|| AppError::NotFound("Menu item".to_string()))?;

        let item = self.build_menu_item(menu_item_id, input)?;
        self.store.menu_items[position] = item.clone();
        Ok(item)
    }

    pub fn delete_menu_item(&mut self, menu_item_id: Uuid) -> AppResult<()> {
        remove_by_id(&mut self.store.menu_items, |m| m.id == menu_item_id, "Menu item")
    }

    fn build_menu_item(&self, id: Uuid, input: MenuItemInput) -> AppResult<MenuItem> {
        let name = check_name(&input.name)?;
        validate_purchase_price(Some(input.cost_per_plate))
            .map_err(|m| AppError::validation("cost_per_plate", m))?;
        for ingredient in &input.ingredients {
            validate_recipe_quantity(ingredient.quantity_per_plate)
                .map_err(|m| AppError::validation("ingredients", m))?;
            if self.store.product(ingredient.product_id).is_none() {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        Ok(MenuItem {
            id,
            name,
            cost_per_plate: input.cost_per_plate,
            ingredients: input.ingredients,
        })
    }
}

fn build_supplier(id: Uuid, input: SupplierInput) -> AppResult<Supplier> {
    let name = check_name(&input.name)?;
    input.contact.validate()?;
    if let Some(email) = &input.contact.email {
        validate_email(email).map_err(|m| AppError::validation("email", m))?;
    }
    if let Some(phone) = &input.contact.phone {
        validate_phone(phone).map_err(|m| AppError::validation("phone", m))?;
    }

    Ok(Supplier {
        id,
        name,
        contact: input.contact,
        created_at: Utc::now(),
    })
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    resource: &str,
) -> AppResult<()> {
    let before = items.len();
    items.retain(|item| !matches(item));

    if items.len() == before {
        return Err(AppError::NotFound(resource.to_string()));
    }
    tracing::info!(resource, "Deleted catalog entry");
    Ok(())
}
