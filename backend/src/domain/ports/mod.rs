//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_command;
mod catalog_query;
mod catalog_repository;
mod deck_command;
mod deck_query;
mod deck_repository;
mod ledger_repository;
mod purchase_command;

#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_command::CatalogCommand;
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::CatalogQuery;
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{CatalogRepository, CatalogRepositoryError};
#[cfg(test)]
pub use deck_command::MockDeckCommand;
pub use deck_command::DeckCommand;
#[cfg(test)]
pub use deck_query::MockDeckQuery;
pub use deck_query::DeckQuery;
#[cfg(test)]
pub use deck_repository::MockDeckRepository;
pub use deck_repository::{DeckRepository, DeckRepositoryError};
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerRepository, LedgerRepositoryError, PurchaseOrder};
#[cfg(test)]
pub use purchase_command::MockPurchaseCommand;
pub use purchase_command::{PurchaseCommand, PurchaseReceipt};
