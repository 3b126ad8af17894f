//! Domain models for the Retail Inventory Manager

mod import_export;
mod inventory;
mod master_data;
mod user;

pub use import_export::*;
pub use inventory::*;
pub use master_data::*;
pub use user::*;
