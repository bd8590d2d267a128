//! Driving port for browsing the catalogue.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, Hero, HeroId, HeroListing, Spell, SpellId, SpellListing, UserId};

/// Catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// One page of heroes.
    async fn list_heroes(&self, listing: HeroListing) -> Result<Page<Hero>, Error>;

    /// One page of spells.
    async fn list_spells(&self, listing: SpellListing) -> Result<Page<Spell>, Error>;

    /// A single hero; `not_found` when absent.
    async fn hero(&self, id: &HeroId) -> Result<Hero, Error>;

    /// A single spell; `not_found` when absent.
    async fn spell(&self, id: &SpellId) -> Result<Spell, Error>;

    /// Heroes owned by `user`.
    async fn owned_heroes(&self, user: &UserId) -> Result<Vec<Hero>, Error>;

    /// Spells owned by `user`.
    async fn owned_spells(&self, user: &UserId) -> Result<Vec<Spell>, Error>;
}
