//! Domain models for the Restaurant Inventory Ledger

mod inventory;
mod menu;
mod order;
mod outlet;
mod product;
mod status;
mod supplier;
mod threshold;

pub use inventory::*;
pub use menu::*;
pub use order::*;
pub use outlet::*;
pub use product::*;
pub use status::*;
pub use supplier::*;
pub use threshold::*;
