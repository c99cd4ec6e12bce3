//! Validation utilities for the Restaurant Inventory Ledger

use rust_decimal::Decimal;

use crate::models::OrderLine;

// ============================================================================
// Stock Validations
// ============================================================================

/// Largest quantity, minimum, price or per-plate amount a single record may carry.
///
/// Products of two bounded values (and sums of those over any realistic
/// number of records) stay far inside `Decimal`'s range.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest number of plates on one order line
pub const MAX_PLATES_PER_LINE: u32 = 10_000;

/// Validate a received or removed quantity
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    if quantity > MAX_QUANTITY {
        return Err("Quantity exceeds the maximum of 1,000,000,000");
    }
    Ok(())
}

/// Validate a low-stock minimum (zero is allowed and means "warn only when empty")
pub fn validate_threshold_minimum(min_quantity: Decimal) -> Result<(), &'static str> {
    if min_quantity < Decimal::ZERO {
        return Err("Threshold minimum cannot be negative");
    }
    if min_quantity > MAX_QUANTITY {
        return Err("Threshold minimum exceeds the maximum of 1,000,000,000");
    }
    Ok(())
}

/// Validate an optional unit price (purchase price or cost per plate)
pub fn validate_purchase_price(price: Option<Decimal>) -> Result<(), &'static str> {
    match price {
        Some(p) if p < Decimal::ZERO => Err("Price cannot be negative"),
        Some(p) if p > MAX_QUANTITY => Err("Price exceeds the maximum of 1,000,000,000"),
        _ => Ok(()),
    }
}

/// Validate a recipe quantity per plate
pub fn validate_recipe_quantity(quantity_per_plate: Decimal) -> Result<(), &'static str> {
    if quantity_per_plate <= Decimal::ZERO {
        return Err("Recipe quantity per plate must be positive");
    }
    if quantity_per_plate > MAX_QUANTITY {
        return Err("Recipe quantity per plate exceeds the maximum of 1,000,000,000");
    }
    Ok(())
}

/// Validate manual order lines
pub fn validate_order_lines(lines: &[OrderLine]) -> Result<(), &'static str> {
    if lines.is_empty() {
        return Err("Order must contain at least one item");
    }
    if lines.iter().any(|line| line.quantity == 0) {
        return Err("Order item quantity must be at least 1");
    }
    if lines.iter().any(|line| line.quantity > MAX_PLATES_PER_LINE) {
        return Err("Order item quantity must be at most 10,000");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a display name (product, supplier, outlet, menu item)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > 120 {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate phone number: 7 to 15 digits, separators and a leading `+` allowed
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let mut digits = 0;
    for (i, c) in phone.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if i == 0 => {}
            ' ' | '-' | '(' | ')' => {}
            _ => return Err("Phone number contains invalid characters"),
        }
    }
    if !(7..=15).contains(&digits) {
        return Err("Phone number must have 7 to 15 digits");
    }
    Ok(())
}

/// Validate batch number format (1-40 alphanumeric, `-` or `/`)
pub fn validate_batch_number(batch: &str) -> Result<(), &'static str> {
    if batch.is_empty() || batch.len() > 40 {
        return Err("Batch number must be 1 to 40 characters");
    }
    if !batch
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
    {
        return Err("Batch number must be alphanumeric");
    }
    Ok(())
}
