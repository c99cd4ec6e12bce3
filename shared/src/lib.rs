//! Shared types and models for the Restaurant Inventory Ledger
//!
//! This crate contains the domain models and the pure stock derivations
//! shared between the ledger, the browser host (via WASM), and other
//! components of the system.

pub mod models;
pub mod persistence;
pub mod types;
pub mod validation;

pub use models::*;
pub use persistence::*;
pub use types::*;
pub use validation::*;
