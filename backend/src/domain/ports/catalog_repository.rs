//! Port for hero and spell definitions.

use async_trait::async_trait;

use crate::domain::{Hero, HeroId, HeroListing, Spell, SpellId, SpellListing, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum CatalogRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
        /// An entry with the same identifier already exists.
        Duplicate { message: String } => "catalogue entry already exists: {message}",
    }
}

/// Read and author catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch a hero by id.
    async fn find_hero(&self, id: &HeroId) -> Result<Option<Hero>, CatalogRepositoryError>;

    /// Fetch a spell by id.
    async fn find_spell(&self, id: &SpellId) -> Result<Option<Spell>, CatalogRepositoryError>;

    /// One page of heroes, filtered and ordered per `listing`.
    ///
    /// Ties on the sort key are broken by id.
    async fn list_heroes(&self, listing: &HeroListing) -> Result<Vec<Hero>, CatalogRepositoryError>;

    /// One page of spells, filtered and ordered per `listing`.
    async fn list_spells(
        &self,
        listing: &SpellListing,
    ) -> Result<Vec<Spell>, CatalogRepositoryError>;

    /// Heroes `user` has purchased, by name.
    async fn owned_heroes(&self, user: &UserId) -> Result<Vec<Hero>, CatalogRepositoryError>;

    /// Spells `user` has purchased, by name.
    async fn owned_spells(&self, user: &UserId) -> Result<Vec<Spell>, CatalogRepositoryError>;

    /// Persist a new hero.
    async fn insert_hero(&self, hero: &Hero) -> Result<(), CatalogRepositoryError>;

    /// Persist a new spell.
    async fn insert_spell(&self, spell: &Spell) -> Result<(), CatalogRepositoryError>;
}
