//! Concrete collaborators wired into the order manager

pub mod cart;
pub mod settlement;

pub use cart::DbCartSource;
pub use settlement::MockSettlementGateway;
