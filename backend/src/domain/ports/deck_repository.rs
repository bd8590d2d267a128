//! Port for decks and deck membership.
//!
//! [`DeckRepository::place_item`] is the only write that inserts membership.
//! It resolves or creates the target deck, re-checks ownership and inserts
//! the row in one unit, so a rejected placement never leaves a new deck
//! behind.

use async_trait::async_trait;

use crate::domain::{Deck, DeckId, DeckPlacement, ItemRef, NewDeck, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by deck adapters.
    pub enum DeckRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "deck store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "deck store query failed: {message}",
        /// The placing user does not own the item.
        NotOwned => "item is not owned by the deck owner",
        /// The deck does not exist or belongs to someone else.
        DeckNotFound => "deck not found",
        /// The store aborted the unit because of a concurrent writer.
        Contention { message: String } => "deck store contention: {message}",
    }
}

/// Deck storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Fetch a deck with its membership.
    async fn find_deck(&self, id: &DeckId) -> Result<Option<Deck>, DeckRepositoryError>;

    /// Create an empty deck.
    async fn create_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError>;

    /// All decks owned by `user`, oldest first.
    async fn decks_for_user(&self, user: &UserId) -> Result<Vec<Deck>, DeckRepositoryError>;

    /// Slot an owned item into the resolved deck and return that deck's id.
    ///
    /// Inserting an item that is already slotted is a no-op.
    async fn place_item(&self, placement: &DeckPlacement) -> Result<DeckId, DeckRepositoryError>;

    /// Remove an item from a deck. Removing an absent item succeeds.
    async fn remove_item(&self, deck: &DeckId, item: &ItemRef) -> Result<(), DeckRepositoryError>;
}
