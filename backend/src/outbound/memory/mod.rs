//! Process-local store implementing every driven port.
//!
//! [`InMemoryStore`] keeps accounts, the catalogue, ownership facts and decks
//! behind a single mutex, so each port call observes and mutates one
//! consistent snapshot. It backs the server when no database is configured
//! and is the substrate for behavioural tests.

mod store;

pub use store::InMemoryStore;
