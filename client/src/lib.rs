//! API client and dashboard session for the Retail Inventory Manager
//!
//! [`HttpGateway`] talks to the REST server. [`DashboardSession`] owns the
//! loaded records and the grid state, reloads after every successful write
//! and applies only the most recently requested reload.

pub mod config;
pub mod error;
pub mod gateway;
pub mod sequence;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{ExportedFile, HttpGateway, InventoryGateway};
pub use sequence::{RequestSequence, Ticket};
pub use session::{DashboardSession, Notice, SaveIntent, Saved};
