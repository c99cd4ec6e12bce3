//! Versioned schema for the blobs the browser host keeps in local storage
//!
//! The host stores whatever string these functions produce and hands it back
//! unchanged on the next load. Every read checks the schema version and
//! migrates older layouts, so a stale or hand-edited blob produces a
//! [`PersistenceError`] instead of bad data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::LowStockThreshold;
use crate::validation::validate_threshold_minimum;

/// Storage key for low-stock thresholds
pub const THRESHOLDS_KEY: &str = "lowStockThresholds";
/// Storage key for the outlet the user last selected
pub const SELECTED_OUTLET_KEY: &str = "selectedOutlet";

/// Current layout version of both blobs
pub const SCHEMA_VERSION: u64 = 1;

/// Errors reading or writing persisted blobs
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Malformed {key} blob: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected layout for {key} blob")]
    UnexpectedShape { key: &'static str },

    #[error("Unsupported {key} schema version {version}")]
    UnsupportedVersion { key: &'static str, version: u64 },

    #[error("Invalid record in {key}: {message}")]
    InvalidRecord {
        key: &'static str,
        message: &'static str,
    },
}

/// Version 1 thresholds envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredThresholds {
    pub version: u64,
    pub thresholds: Vec<LowStockThreshold>,
}

/// Version 0: bare array of camelCase records, ids optional
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyThreshold {
    id: Option<Uuid>,
    product_id: Uuid,
    outlet_id: Uuid,
    min_quantity: Decimal,
    reason: Option<String>,
}

impl From<LegacyThreshold> for LowStockThreshold {
    fn from(legacy: LegacyThreshold) -> Self {
        Self {
            id: legacy.id.unwrap_or_else(Uuid::new_v4),
            product_id: legacy.product_id,
            outlet_id: legacy.outlet_id,
            min_quantity: legacy.min_quantity,
            reason: legacy.reason.filter(|r| !r.trim().is_empty()),
        }
    }
}

/// Version 1 selected-outlet envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSelectedOutlet {
    pub version: u64,
    pub outlet_id: Option<Uuid>,
}

fn schema_version(
    key: &'static str,
    object: &serde_json::Map<String, Value>,
) -> Result<u64, PersistenceError> {
    object
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(PersistenceError::UnexpectedShape { key })
}

/// Read the thresholds blob, migrating legacy layouts
pub fn decode_thresholds(raw: &str) -> Result<Vec<LowStockThreshold>, PersistenceError> {
    const KEY: &str = THRESHOLDS_KEY;

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|source| PersistenceError::Malformed { key: KEY, source })?;

    let version = match &value {
        Value::Array(_) => 0,
        Value::Object(object) => schema_version(KEY, object)?,
        _ => return Err(PersistenceError::UnexpectedShape { key: KEY }),
    };

    let thresholds: Vec<LowStockThreshold> = match version {
        0 => {
            let legacy: Vec<LegacyThreshold> = serde_json::from_value(value)
                .map_err(|source| PersistenceError::Malformed { key: KEY, source })?;
            legacy.into_iter().map(LowStockThreshold::from).collect()
        }
        1 => {
            let stored: StoredThresholds = serde_json::from_value(value)
                .map_err(|source| PersistenceError::Malformed { key: KEY, source })?;
            stored.thresholds
        }
        version => return Err(PersistenceError::UnsupportedVersion { key: KEY, version }),
    };

    for threshold in &thresholds {
        validate_threshold_minimum(threshold.min_quantity)
            .map_err(|message| PersistenceError::InvalidRecord { key: KEY, message })?;
    }

    Ok(thresholds)
}

/// Write thresholds in the current layout
pub fn encode_thresholds(thresholds: &[LowStockThreshold]) -> Result<String, PersistenceError> {
    let stored = StoredThresholds {
        version: SCHEMA_VERSION,
        thresholds: thresholds.to_vec(),
    };
    serde_json::to_string(&stored).map_err(|source| PersistenceError::Malformed {
        key: THRESHOLDS_KEY,
        source,
    })
}

/// Read the selected outlet, accepting the legacy bare or quoted id
pub fn decode_selected_outlet(raw: &str) -> Result<Option<Uuid>, PersistenceError> {
    const KEY: &str = SELECTED_OUTLET_KEY;

    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    let parse_id = |s: &str| {
        Uuid::parse_str(s.trim()).map_err(|_| PersistenceError::InvalidRecord {
            key: KEY,
            message: "Outlet id is not a valid UUID",
        })
    };

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Ok(Value::String(s)) => parse_id(&s).map(Some),
        Ok(Value::Object(object)) => match schema_version(KEY, &object)? {
            1 => {
                let stored: StoredSelectedOutlet = serde_json::from_value(Value::Object(object))
                    .map_err(|source| PersistenceError::Malformed { key: KEY, source })?;
                Ok(stored.outlet_id)
            }
            version => Err(PersistenceError::UnsupportedVersion { key: KEY, version }),
        },
        Ok(_) => Err(PersistenceError::UnexpectedShape { key: KEY }),
        // Not JSON at all: the oldest layout stored the raw id
        Err(_) => parse_id(trimmed).map(Some),
    }
}

/// Write the selected outlet in the current layout
pub fn encode_selected_outlet(outlet_id: Option<Uuid>) -> Result<String, PersistenceError> {
    let stored = StoredSelectedOutlet {
        version: SCHEMA_VERSION,
        outlet_id,
    };
    serde_json::to_string(&stored).map_err(|source| PersistenceError::Malformed {
        key: SELECTED_OUTLET_KEY,
        source,
    })
}
