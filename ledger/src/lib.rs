//! Restaurant Inventory Ledger
//!
//! Stock ledger for a multi-outlet restaurant: inventory lots, stock
//! reductions, manual orders that consume recipe ingredients, and low-stock
//! thresholds, all held in an in-memory store owned by a [`Session`].

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorDetail};
pub use session::Session;
pub use store::EntityStore;
