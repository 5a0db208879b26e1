//! Order lifecycle
//!
//! `manager` drives the checkout saga and status transitions; `traits`
//! holds the collaborator seams it consumes.

pub mod manager;
pub mod traits;

pub use manager::{ManagerError, ManagerResult, OrderManager};
pub use traits::{CartSource, Settlement, SettlementGateway};
