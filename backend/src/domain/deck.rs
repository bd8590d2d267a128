//! Decks and deck membership.
//!
//! A deck belongs to exactly one user, fixed at creation, and holds ordered
//! sets of heroes and spells. Decks are created explicitly or on demand by
//! the first placement that names no existing deck; nothing in the core
//! deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DeckId, HeroId, ItemRef, SpellId, UserId};

/// Name given to decks created on demand.
pub const DEFAULT_DECK_NAME: &str = "Deck";
/// Maximum deck name length, in characters.
pub const DECK_NAME_MAX: usize = 64;

/// A user's deck with its current membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Deck identifier.
    pub id: DeckId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Slotted heroes in insertion order.
    pub hero_ids: Vec<HeroId>,
    /// Slotted spells in insertion order.
    pub spell_ids: Vec<SpellId>,
    /// Creation timestamp; decks are listed oldest first.
    pub created_at: DateTime<Utc>,
}

impl Deck {
    /// Whether `item` is slotted in this deck.
    #[must_use]
    pub fn contains(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Hero(id) => self.hero_ids.contains(id),
            ItemRef::Spell(id) => self.spell_ids.contains(id),
        }
    }

    /// Whether the deck has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hero_ids.is_empty() && self.spell_ids.is_empty()
    }
}

/// Validation failures for [`DeckDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckValidationError {
    /// Name exceeded [`DECK_NAME_MAX`] characters.
    #[error("deck name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound that was exceeded.
        max: usize,
    },
}

/// Caller-supplied attributes for an explicitly created deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckDraft {
    /// Display name; blank names fall back to [`DEFAULT_DECK_NAME`].
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl DeckDraft {
    /// Validate the draft into an insertable deck for `owner`.
    pub fn into_new_deck(self, owner: UserId) -> Result<NewDeck, DeckValidationError> {
        let name = self.name.trim();
        if name.chars().count() > DECK_NAME_MAX {
            return Err(DeckValidationError::NameTooLong {
                max: DECK_NAME_MAX,
            });
        }
        let name = if name.is_empty() {
            DEFAULT_DECK_NAME
        } else {
            name
        };
        Ok(NewDeck {
            owner,
            name: name.to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

/// A validated deck ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeck {
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl NewDeck {
    /// The empty deck materialised for a user on first placement.
    #[must_use]
    pub fn default_for(owner: UserId) -> Self {
        Self {
            owner,
            name: DEFAULT_DECK_NAME.to_owned(),
            description: String::new(),
        }
    }
}

/// Which deck a placement lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckTarget {
    /// A deck already owned by the placing user.
    Existing(DeckId),
    /// The user's oldest deck, created when the user has none.
    Default,
    /// A brand-new empty deck.
    New,
}

/// Request to slot an owned item into one of the owner's decks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPlacement {
    /// User performing the placement; must own `item`.
    pub owner: UserId,
    /// Destination deck.
    pub target: DeckTarget,
    /// Item to slot.
    pub item: ItemRef,
}
