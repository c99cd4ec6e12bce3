//! WebAssembly module for the restaurant inventory front end
//!
//! Provides client-side computation for:
//! - Stock status classification
//! - Ingredient requirement checks before an order is placed
//! - Migration of the browser-stored threshold and outlet blobs

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::persistence::*;
pub use shared::validation::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::from_str(raw.trim()).map_err(|e| js_error(field, e))
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, JsValue> {
    Decimal::try_from(value).map_err(|e| js_error(field, e))
}

fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Classify a product's stock status.
///
/// `expiry` and `today` are `YYYY-MM-DD` dates.
#[wasm_bindgen]
pub fn classify_stock(
    stock: f64,
    threshold: Option<f64>,
    expiry: Option<String>,
    today: &str,
) -> Result<String, JsValue> {
    let stock = to_decimal("stock", stock)?;
    let threshold = threshold.map(|t| to_decimal("threshold", t)).transpose()?;
    let expiry = expiry
        .filter(|e| !e.trim().is_empty())
        .map(|e| parse_date("expiry", &e))
        .transpose()?;
    let today = parse_date("today", today)?;

    let status = classify_stock_status(stock, threshold, expiry, today, &ExpiryWindows::default());
    Ok(status.to_string())
}

/// Classify against the browser's current date
#[wasm_bindgen]
pub fn classify_stock_today(
    stock: f64,
    threshold: Option<f64>,
    expiry: Option<String>,
) -> Result<String, JsValue> {
    classify_stock(stock, threshold, expiry, &today_iso())
}

#[cfg(target_arch = "wasm32")]
fn today_iso() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn today_iso() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Whether a status should be highlighted in the stock list.
///
/// Accepts the display label or the serialized name.
#[wasm_bindgen]
pub fn status_needs_attention(status: &str) -> bool {
    [
        StockStatus::OutOfStock,
        StockStatus::LowStock,
        StockStatus::ExpiringSoon,
        StockStatus::NearExpiry,
        StockStatus::GoodStock,
    ]
    .into_iter()
    .find(|s| {
        s.to_string() == status
            || serde_json::to_value(s).is_ok_and(|v| v.as_str() == Some(status))
    })
    .is_some_and(|s| s.needs_attention())
}

/// Check a prospective order against outlet stock.
///
/// `stock_json` maps product id to on-hand quantity. Returns the
/// requirement report as JSON.
#[wasm_bindgen]
pub fn check_order_requirements(
    menu_json: &str,
    lines_json: &str,
    stock_json: &str,
) -> Result<String, JsValue> {
    let menu: Vec<MenuItem> =
        serde_json::from_str(menu_json).map_err(|e| js_error("Invalid menu JSON", e))?;
    let lines: Vec<OrderLine> =
        serde_json::from_str(lines_json).map_err(|e| js_error("Invalid order lines JSON", e))?;
    let stock: HashMap<Uuid, Decimal> =
        serde_json::from_str(stock_json).map_err(|e| js_error("Invalid stock JSON", e))?;

    validate_order_lines(&lines).map_err(JsValue::from_str)?;

    let expansion = expand_recipes(&lines, &menu);
    for id in &expansion.unknown_menu_items {
        warn(&format!("Order references unknown menu item {id}"));
    }

    let report = check_requirements(&expansion, |product_id| {
        stock.get(&product_id).copied().unwrap_or(Decimal::ZERO)
    });
    serde_json::to_string(&report).map_err(|e| js_error("Failed to encode report", e))
}

/// Default order total: menu price times plates
#[wasm_bindgen]
pub fn calculate_order_total(menu_json: &str, lines_json: &str) -> Result<String, JsValue> {
    let menu: Vec<MenuItem> =
        serde_json::from_str(menu_json).map_err(|e| js_error("Invalid menu JSON", e))?;
    let lines: Vec<OrderLine> =
        serde_json::from_str(lines_json).map_err(|e| js_error("Invalid order lines JSON", e))?;
    Ok(order_total(&lines, &menu).to_string())
}

/// Rewrite a stored `lowStockThresholds` value in the current layout
#[wasm_bindgen]
pub fn migrate_thresholds_blob(raw: &str) -> Result<String, JsValue> {
    let thresholds = decode_thresholds(raw).map_err(|e| JsValue::from_str(&e.to_string()))?;
    encode_thresholds(&thresholds).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rewrite a stored `selectedOutlet` value in the current layout
#[wasm_bindgen]
pub fn migrate_selected_outlet_blob(raw: &str) -> Result<String, JsValue> {
    let outlet_id = match decode_selected_outlet(raw) {
        Ok(id) => id,
        Err(e) => {
            warn(&format!("Discarding stored outlet selection: {e}"));
            None
        }
    };
    encode_selected_outlet(outlet_id).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a threshold minimum entered in a form
#[wasm_bindgen]
pub fn is_valid_threshold_minimum(min_quantity: f64) -> bool {
    Decimal::try_from(min_quantity)
        .map(|min| validate_threshold_minimum(min).is_ok())
        .unwrap_or(false)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stock() {
        let today = "2024-06-10";
        assert_eq!(classify_stock(0.0, Some(5.0), None, today).unwrap(), "Out of Stock");
        assert_eq!(classify_stock(5.0, Some(5.0), None, today).unwrap(), "Low Stock");
        assert_eq!(classify_stock(6.0, Some(5.0), None, today).unwrap(), "Good Stock");
        assert_eq!(
            classify_stock(6.0, None, Some("2024-06-10".to_string()), today).unwrap(),
            "Expiring Soon"
        );
        assert_eq!(
            classify_stock(6.0, None, Some("2024-06-12".to_string()), today).unwrap(),
            "Near Expiry"
        );
        assert_eq!(
            classify_stock(6.0, None, Some(String::new()), today).unwrap(),
            "Good Stock"
        );
    }

    #[test]
    fn test_classify_stock_today() {
        assert_eq!(classify_stock_today(0.0, None, None).unwrap(), "Out of Stock");
        assert_eq!(classify_stock_today(3.0, None, None).unwrap(), "Good Stock");
    }

    #[test]
    fn test_order_total() {
        let dish = Uuid::new_v4();
        let menu = format!(
            r#"[{{"id":"{dish}","name":"Tikka","cost_per_plate":"180.50","ingredients":[]}}]"#
        );
        let lines = format!(r#"[{{"menu_item_id":"{dish}","quantity":2}}]"#);
        assert_eq!(calculate_order_total(&menu, &lines).unwrap(), "361.00");
    }

    #[test]
    fn test_check_order_requirements() {
        let dish = Uuid::new_v4();
        let rice = Uuid::new_v4();
        let menu = format!(
            r#"[{{"id":"{dish}","name":"Veg Biryani","cost_per_plate":"220",
                "ingredients":[{{"product_id":"{rice}","quantity_per_plate":"1.5"}}]}}]"#
        );
        let lines = format!(r#"[{{"menu_item_id":"{dish}","quantity":2}}]"#);
        let stock = format!(r#"{{"{rice}":"2"}}"#);

        let json = check_order_requirements(&menu, &lines, &stock).unwrap();
        let report: RequirementReport = serde_json::from_str(&json).unwrap();
        assert!(!report.all_sufficient());
        assert_eq!(report.items[0].required, Decimal::from(3));
        assert_eq!(report.items[0].shortfall, Decimal::from(1));
    }

    #[test]
    fn test_migrate_blobs() {
        let product = Uuid::new_v4();
        let outlet = Uuid::new_v4();
        let legacy = format!(
            r#"[{{"productId":"{product}","outletId":"{outlet}","minQuantity":"5"}}]"#
        );
        let migrated = migrate_thresholds_blob(&legacy).unwrap();
        assert_eq!(decode_thresholds(&migrated).unwrap().len(), 1);

        let selected = migrate_selected_outlet_blob(&outlet.to_string()).unwrap();
        assert_eq!(decode_selected_outlet(&selected).unwrap(), Some(outlet));
        let cleared = migrate_selected_outlet_blob("not-an-id").unwrap();
        assert_eq!(decode_selected_outlet(&cleared).unwrap(), None);
    }

    #[test]
    fn test_status_needs_attention() {
        assert!(status_needs_attention("Low Stock"));
        assert!(status_needs_attention("expiring_soon"));
        assert!(!status_needs_attention("good_stock"));
        assert!(!status_needs_attention("Sold Out"));
    }

    #[test]
    fn test_threshold_minimum() {
        assert!(is_valid_threshold_minimum(0.0));
        assert!(!is_valid_threshold_minimum(-1.0));
    }
}
