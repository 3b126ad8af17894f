//! Shared types and models for the Retail Inventory Manager
//!
//! This crate contains the inventory record model, write-path validation and
//! the pure grid pipeline (filter, group, sort, paginate, totals) shared
//! between the backend, the API client and the browser (via WASM).

pub mod grid;
pub mod models;
pub mod types;
pub mod validation;

pub use grid::*;
pub use models::*;
pub use types::*;
pub use validation::*;
