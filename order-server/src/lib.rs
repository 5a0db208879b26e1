//! Order Server - e-commerce order creation and lifecycle core
//!
//! # Architecture
//!
//! - **Inventory** (`inventory`): authoritative stock counters with
//!   atomic reserve/release
//! - **Orders** (`orders`): checkout saga, status machine, cancellation
//! - **Database** (`db`): SQLite pool, migrations, repositories
//! - **HTTP API** (`api`): RESTful routes over the manager
//!
//! # Module layout
//!
//! ```text
//! order-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # actor extraction
//! ├── inventory/     # stock ledger
//! ├── orders/        # lifecycle manager + collaborator seams
//! ├── services/      # concrete cart source, settlement gateway
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # pool + repositories
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::CurrentActor;
pub use core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use orders::{OrderManager, traits::CartSource, traits::SettlementGateway};
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger_with_file;

/// Load .env, ensure the work dir exists, and bring up logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    std::fs::create_dir_all(config.log_dir())?;

    let log_dir = config.log_dir();
    if config.is_production() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}
