//! Driving port for catalogue authoring.

use async_trait::async_trait;

use crate::domain::{Error, Hero, HeroDraft, Spell, SpellDraft, UserId};

/// Admin-only catalogue writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Validate and publish a hero.
    ///
    /// # Errors
    ///
    /// `forbidden` unless `user` is an admin, `invalid_request` for an
    /// invalid draft.
    async fn create_hero(&self, user: &UserId, draft: HeroDraft) -> Result<Hero, Error>;

    /// Validate and publish a spell. Same contract as
    /// [`CatalogCommand::create_hero`].
    async fn create_spell(&self, user: &UserId, draft: SpellDraft) -> Result<Spell, Error>;
}
