//! HTTP handlers

pub mod auth;
pub mod export_templates;
pub mod health;
pub mod import_export;
pub mod inventory;
pub mod master_data;

pub use auth::*;
pub use export_templates::*;
pub use health::*;
pub use import_export::*;
pub use inventory::*;
pub use master_data::*;
