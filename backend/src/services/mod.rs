//! Business logic services for the Retail Inventory Manager

pub mod auth;
pub mod export;
pub mod export_template;
pub mod import;
pub mod inventory;
pub mod master_data;

pub use auth::AuthService;
pub use export::ExportService;
pub use export_template::ExportTemplateService;
pub use import::ImportService;
pub use inventory::InventoryService;
pub use master_data::MasterDataService;
