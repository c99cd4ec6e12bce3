//! Business logic services for the Restaurant Inventory Ledger

pub mod audit;
pub mod catalog;
pub mod inventory;
pub mod order;
pub mod reporting;
pub mod threshold;

pub use audit::AuditService;
pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use order::OrderService;
pub use reporting::ReportingService;
pub use threshold::ThresholdService;
