//! Driving port for reading decks.

use async_trait::async_trait;

use crate::domain::{Deck, DeckId, Error, UserId};

/// Read a user's decks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckQuery: Send + Sync {
    /// All decks owned by `user`, oldest first, with membership.
    async fn decks_for_user(&self, user: &UserId) -> Result<Vec<Deck>, Error>;

    /// One deck, visible only to its owner.
    async fn deck_for_user(&self, user: &UserId, deck: &DeckId) -> Result<Deck, Error>;
}
