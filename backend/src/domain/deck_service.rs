//! Deck composition services.
//!
//! Placement checks ownership before anything is written, resolves which
//! deck the item lands in, and delegates the atomic deck-creation plus
//! membership insert to [`DeckRepository::place_item`]. Every mutation
//! answers with the caller's refreshed deck list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CatalogRepository, CatalogRepositoryError, DeckCommand, DeckQuery, DeckRepository,
    DeckRepositoryError, LedgerRepository, LedgerRepositoryError,
};
use crate::domain::{
    Deck, DeckDraft, DeckId, DeckPlacement, DeckTarget, Error, HeroId, ItemRef, RetryPolicy,
    SpellId, UserId,
};

/// Deck service implementing [`DeckCommand`] and [`DeckQuery`].
#[derive(Clone)]
pub struct DeckService<D, L, C> {
    decks: Arc<D>,
    ledger: Arc<L>,
    catalog: Arc<C>,
    retry: RetryPolicy,
}

impl<D, L, C> DeckService<D, L, C> {
    /// Create a service with the default retry policy.
    pub fn new(decks: Arc<D>, ledger: Arc<L>, catalog: Arc<C>) -> Self {
        Self {
            decks,
            ledger,
            catalog,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the conflict retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<D, L, C> DeckService<D, L, C>
where
    D: DeckRepository,
    L: LedgerRepository,
    C: CatalogRepository,
{
    fn map_deck_error(error: DeckRepositoryError) -> Error {
        match error {
            DeckRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("deck store unavailable: {message}"))
            }
            DeckRepositoryError::Query { message } => {
                Error::internal(format!("deck store error: {message}"))
            }
            DeckRepositoryError::NotOwned => Error::not_owned("item has not been purchased"),
            DeckRepositoryError::DeckNotFound => Error::not_found("deck not found"),
            DeckRepositoryError::Contention { message } => Error::conflict(message),
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

    fn map_catalog_error(error: CatalogRepositoryError) -> Error {
        match error {
            CatalogRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            other => Error::internal(format!("catalogue error: {other}")),
        }
    }

    async fn owned_deck(&self, user: &UserId, deck: &DeckId) -> Result<Option<Deck>, Error> {
        let found = self
            .decks
            .find_deck(deck)
            .await
            .map_err(Self::map_deck_error)?;
        match found {
            Some(found) if found.owner != *user => Err(Error::not_found("deck not found")),
            other => Ok(other),
        }
    }

    async fn resolve_target(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
    ) -> Result<DeckTarget, Error> {
        let Some(deck) = deck else {
            return Ok(DeckTarget::Default);
        };
        Ok(match self.owned_deck(user, &deck).await? {
            Some(_) => DeckTarget::Existing(deck),
            None => DeckTarget::New,
        })
    }

    async fn ensure_item_exists(&self, item: &ItemRef) -> Result<(), Error> {
        let exists = match item {
            ItemRef::Hero(id) => self
                .catalog
                .find_hero(id)
                .await
                .map_err(Self::map_catalog_error)?
                .is_some(),
            ItemRef::Spell(id) => self
                .catalog
                .find_spell(id)
                .await
                .map_err(Self::map_catalog_error)?
                .is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("{} not found", item.kind())))
        }
    }

    async fn place(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
        item: ItemRef,
    ) -> Result<Vec<Deck>, Error> {
        let owned = self
            .ledger
            .has_ownership(user, &item)
            .await
            .map_err(Self::map_ledger_error)?;
        if !owned {
            return Err(Error::not_owned(format!(
                "{} has not been purchased",
                item.kind()
            )));
        }

        let placement = DeckPlacement {
            owner: *user,
            target: self.resolve_target(user, deck).await?,
            item,
        };
        let decks = self.decks.as_ref();
        let placement = &placement;
        let deck_id = self
            .retry
            .run("place deck item", || async move {
                decks
                    .place_item(placement)
                    .await
                    .map_err(Self::map_deck_error)
            })
            .await?;

        info!(user = %user, deck = %deck_id, item = %item, "item added to deck");
        self.list(user).await
    }

    async fn remove(
        &self,
        user: &UserId,
        deck: &DeckId,
        item: ItemRef,
    ) -> Result<Vec<Deck>, Error> {
        if self.owned_deck(user, deck).await?.is_none() {
            return Err(Error::not_found("deck not found"));
        }
        self.ensure_item_exists(&item).await?;

        self.decks
            .remove_item(deck, &item)
            .await
            .map_err(Self::map_deck_error)?;

        info!(user = %user, deck = %deck, item = %item, "item removed from deck");
        self.list(user).await
    }

    async fn list(&self, user: &UserId) -> Result<Vec<Deck>, Error> {
        self.decks
            .decks_for_user(user)
            .await
            .map_err(Self::map_deck_error)
    }
}

#[async_trait]
impl<D, L, C> DeckCommand for DeckService<D, L, C>
where
    D: DeckRepository,
    L: LedgerRepository,
    C: CatalogRepository,
{
    async fn add_hero_to_deck(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
        hero: &HeroId,
    ) -> Result<Vec<Deck>, Error> {
        self.place(user, deck, ItemRef::Hero(*hero)).await
    }

    async fn delete_hero_from_deck(
        &self,
        user: &UserId,
        deck: &DeckId,
        hero: &HeroId,
    ) -> Result<Vec<Deck>, Error> {
        self.remove(user, deck, ItemRef::Hero(*hero)).await
    }

    async fn add_spell_to_deck(
        &self,
        user: &UserId,
        deck: Option<DeckId>,
        spell: &SpellId,
    ) -> Result<Vec<Deck>, Error> {
        self.place(user, deck, ItemRef::Spell(*spell)).await
    }

    async fn delete_spell_from_deck(
        &self,
        user: &UserId,
        deck: &DeckId,
        spell: &SpellId,
    ) -> Result<Vec<Deck>, Error> {
        self.remove(user, deck, ItemRef::Spell(*spell)).await
    }

    async fn create_deck(&self, user: &UserId, draft: DeckDraft) -> Result<Vec<Deck>, Error> {
        let new_deck = draft
            .into_new_deck(*user)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if self
            .ledger
            .find_account(user)
            .await
            .map_err(Self::map_ledger_error)?
            .is_none()
        {
            return Err(Error::not_found("account not found"));
        }

        let deck = self
            .decks
            .create_deck(&new_deck)
            .await
            .map_err(Self::map_deck_error)?;

        info!(user = %user, deck = %deck.id, "deck created");
        self.list(user).await
    }
}

#[async_trait]
impl<D, L, C> DeckQuery for DeckService<D, L, C>
where
    D: DeckRepository,
    L: LedgerRepository,
    C: CatalogRepository,
{
    async fn decks_for_user(&self, user: &UserId) -> Result<Vec<Deck>, Error> {
        self.list(user).await
    }

    async fn deck_for_user(&self, user: &UserId, deck: &DeckId) -> Result<Deck, Error> {
        self.owned_deck(user, deck)
            .await?
            .ok_or_else(|| Error::not_found("deck not found"))
    }
}

#[cfg(test)]
#[path = "deck_service_tests.rs"]
mod tests;
