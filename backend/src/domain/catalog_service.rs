//! Catalogue browsing and admin authoring.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use tracing::info;

use crate::domain::ports::{
    CatalogCommand, CatalogQuery, CatalogRepository, CatalogRepositoryError, LedgerRepository,
    LedgerRepositoryError,
};
use crate::domain::{
    Error, Hero, HeroDraft, HeroId, HeroListing, Spell, SpellDraft, SpellId, SpellListing, UserId,
};

/// Catalogue service implementing [`CatalogQuery`] and [`CatalogCommand`].
#[derive(Clone)]
pub struct CatalogService<C, L> {
    catalog: Arc<C>,
    ledger: Arc<L>,
}

impl<C, L> CatalogService<C, L> {
    /// Create a new service over the given repositories.
    pub fn new(catalog: Arc<C>, ledger: Arc<L>) -> Self {
        Self { catalog, ledger }
    }
}

impl<C, L> CatalogService<C, L>
where
    C: CatalogRepository,
    L: LedgerRepository,
{
    fn map_catalog_error(error: CatalogRepositoryError) -> Error {
        match error {
            CatalogRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            CatalogRepositoryError::Query { message } => {
                Error::internal(format!("catalogue error: {message}"))
            }
            CatalogRepositoryError::Duplicate { message } => {
                Error::conflict(format!("catalogue entry already exists: {message}"))
            }
        }
    }

    fn map_ledger_error(error: LedgerRepositoryError) -> Error {
        match error {
            LedgerRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("ledger unavailable: {message}"))
            }
            other => Error::internal(format!("ledger error: {other}")),
        }
    }

    async fn ensure_admin(&self, user: &UserId) -> Result<(), Error> {
        let account = self
            .ledger
            .find_account(user)
            .await
            .map_err(Self::map_ledger_error)?;
        match account {
            Some(account) if account.is_admin() => Ok(()),
            _ => Err(Error::forbidden("catalogue authoring requires an admin account")),
        }
    }
}

#[async_trait]
impl<C, L> CatalogQuery for CatalogService<C, L>
where
    C: CatalogRepository,
    L: LedgerRepository,
{
    async fn list_heroes(&self, listing: HeroListing) -> Result<Page<Hero>, Error> {
        let items = self
            .catalog
            .list_heroes(&listing)
            .await
            .map_err(Self::map_catalog_error)?;
        Ok(Page::new(items, listing.page))
    }

    async fn list_spells(&self, listing: SpellListing) -> Result<Page<Spell>, Error> {
        let items = self
            .catalog
            .list_spells(&listing)
            .await
            .map_err(Self::map_catalog_error)?;
        Ok(Page::new(items, listing.page))
    }

    async fn hero(&self, id: &HeroId) -> Result<Hero, Error> {
        self.catalog
            .find_hero(id)
            .await
            .map_err(Self::map_catalog_error)?
            .ok_or_else(|| Error::not_found("hero not found"))
    }

    async fn spell(&self, id: &SpellId) -> Result<Spell, Error> {
        self.catalog
            .find_spell(id)
            .await
            .map_err(Self::map_catalog_error)?
            .ok_or_else(|| Error::not_found("spell not found"))
    }

    async fn owned_heroes(&self, user: &UserId) -> Result<Vec<Hero>, Error> {
        self.catalog
            .owned_heroes(user)
            .await
            .map_err(Self::map_catalog_error)
    }

    async fn owned_spells(&self, user: &UserId) -> Result<Vec<Spell>, Error> {
        self.catalog
            .owned_spells(user)
            .await
            .map_err(Self::map_catalog_error)
    }
}

#[async_trait]
impl<C, L> CatalogCommand for CatalogService<C, L>
where
    C: CatalogRepository,
    L: LedgerRepository,
{
    async fn create_hero(&self, user: &UserId, draft: HeroDraft) -> Result<Hero, Error> {
        self.ensure_admin(user).await?;
        let hero = draft
            .into_hero(HeroId::random())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.catalog
            .insert_hero(&hero)
            .await
            .map_err(Self::map_catalog_error)?;
        info!(user = %user, hero = %hero.id, name = %hero.name, "hero published");
        Ok(hero)
    }

    async fn create_spell(&self, user: &UserId, draft: SpellDraft) -> Result<Spell, Error> {
        self.ensure_admin(user).await?;
        let spell = draft
            .into_spell(SpellId::random())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.catalog
            .insert_spell(&spell)
            .await
            .map_err(Self::map_catalog_error)?;
        info!(user = %user, spell = %spell.id, name = %spell.name, "spell published");
        Ok(spell)
    }
}
