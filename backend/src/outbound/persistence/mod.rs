//! PostgreSQL adapters for the driven ports.
//!
//! Repositories translate between Diesel rows and domain types and hold no
//! game rules. Row structs and the schema stay private to this module; only
//! the repositories, the pool and the migration runner are exported.
//!
//! ```ignore
//! use arena_backend::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/arena")).await?;
//! let ledger = DieselLedgerRepository::new(pool);
//! ```

mod diesel_catalog_repository;
mod diesel_deck_repository;
mod diesel_ledger_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_deck_repository::DieselDeckRepository;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
