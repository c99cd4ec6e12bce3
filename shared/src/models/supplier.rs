//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A supplier products are purchased from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact: SupplierContact,
    pub created_at: DateTime<Utc>,
}

/// Contact details for a supplier.
///
/// Lengths are checked by the derive; phone and email formats by
/// `validate_phone` and `validate_email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct SupplierContact {
    #[validate(length(max = 120))]
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}
