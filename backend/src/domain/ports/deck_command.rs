//! Driving port for deck composition.
//!
//! Every mutation returns the caller's complete, refreshed deck list so
//! clients can re-render all deck state after a single change.

use async_trait::async_trait;

use crate::domain::{Deck, DeckDraft, DeckId, Error, HeroId, SpellId, UserId};

/// Mutate a user's decks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckCommand: Send + Sync {
    /// Slot an owned hero.
    ///
    /// With no `deck`, the user's oldest deck is used and created if the
    /// user has none. An unknown `deck` id yields a new deck.
    ///
    /// # Errors
    ///
    /// `not_owned` when the hero was never bought (no deck is created),
    /// `not_found` when `deck` belongs to another user.
    async fn add_hero_to_deck(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
        hero: &HeroId,
    ) -> Result<Vec<Deck>, Error>;

    /// Remove a hero from one of the user's decks; absent membership is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// `not_found` when the deck or hero does not exist, or the deck belongs
    /// to another user.
    async fn delete_hero_from_deck(
        &self,
        user: &UserId,
        deck: &DeckId,
        hero: &HeroId,
    ) -> Result<Vec<Deck>, Error>;

    /// Slot an owned spell. Same contract as
    /// [`DeckCommand::add_hero_to_deck`].
    async fn add_spell_to_deck(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
        spell: &SpellId,
    ) -> Result<Vec<Deck>, Error>;

    /// Remove a spell. Same contract as
    /// [`DeckCommand::delete_hero_from_deck`].
    async fn delete_spell_from_deck(
        &self,
        user: &UserId,
        deck: &DeckId,
        spell: &SpellId,
    ) -> Result<Vec<Deck>, Error>;

    /// Create an additional empty deck.
    async fn create_deck(&self, user: &UserId, draft: DeckDraft) -> Result<Vec<Deck>, Error>;
}
