//! Purchase orchestration.
//!
//! Each attempt reads the price and the balance, checks funds, then asks the
//! ledger to apply the debit and ownership insert as one unit conditioned on
//! both reads. A lost race surfaces as `conflict` and the whole attempt is
//! re-run under [`RetryPolicy`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CatalogRepository, CatalogRepositoryError, LedgerRepository, LedgerRepositoryError,
    PurchaseCommand, PurchaseOrder, PurchaseReceipt,
};
use crate::domain::{Coins, Error, HeroId, ItemRef, RetryPolicy, SpellId, UserId};

/// Purchase service implementing [`PurchaseCommand`].
#[derive(Clone)]
pub struct PurchaseService<L, C> {
    ledger: Arc<L>,
    catalog: Arc<C>,
    retry: RetryPolicy,
}

impl<L, C> PurchaseService<L, C> {
    /// Create a service with the default retry policy.
    pub fn new(ledger: Arc<L>, catalog: Arc<C>) -> Self {
        Self {
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

impl<L, C> PurchaseService<L, C>
where
    L: LedgerRepository,
    C: CatalogRepository,
{
    fn map_ledger_error(error: LedgerRepositoryError) -> Error {
        match error {
            LedgerRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("ledger unavailable: {message}"))
            }
            LedgerRepositoryError::Query { message } => {
                Error::internal(format!("ledger error: {message}"))
            }
            LedgerRepositoryError::InsufficientFunds { balance, price } => {
                Self::insufficient_funds(balance, price)
            }
            LedgerRepositoryError::AccountNotFound => Error::not_found("account not found"),
            LedgerRepositoryError::ItemNotFound => Error::not_found("item not found"),
            err @ (LedgerRepositoryError::BalanceChanged { .. }
            | LedgerRepositoryError::PriceChanged { .. }
            | LedgerRepositoryError::AlreadyOwned
            | LedgerRepositoryError::Contention { .. }) => Error::conflict(err.to_string()),
        }
    }

    fn map_catalog_error(error: CatalogRepositoryError) -> Error {
        match error {
            CatalogRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            CatalogRepositoryError::Query { message }
            | CatalogRepositoryError::Duplicate { message } => {
                Error::internal(format!("catalogue error: {message}"))
            }
        }
    }

    fn insufficient_funds(balance: Coins, price: Coins) -> Error {
        Error::insufficient_funds("balance too low for this purchase").with_details(json!({
            "balance": balance,
            "price": price,
        }))
    }

    async fn price_of(&self, item: &ItemRef) -> Result<Coins, Error> {
        let price = match item {
            ItemRef::Hero(id) => self
                .catalog
                .find_hero(id)
                .await
                .map_err(Self::map_catalog_error)?
                .map(|hero| hero.price),
            ItemRef::Spell(id) => self
                .catalog
                .find_spell(id)
                .await
                .map_err(Self::map_catalog_error)?
                .map(|spell| spell.price),
        };
        price.ok_or_else(|| Error::not_found(format!("{} not found", item.kind())))
    }

    async fn attempt(&self, user: &UserId, item: ItemRef) -> Result<PurchaseReceipt, Error> {
        let price = self.price_of(&item).await?;
        let account = self
            .ledger
            .find_account(user)
            .await
            .map_err(Self::map_ledger_error)?
            .ok_or_else(|| Error::not_found("account not found"))?;

        if self
            .ledger
            .has_ownership(user, &item)
            .await
            .map_err(Self::map_ledger_error)?
        {
            return Ok(PurchaseReceipt {
                item,
                charged: Coins::ZERO,
                balance: account.bank,
            });
        }

        if account.bank.checked_sub(price).is_none() {
            return Err(Self::insufficient_funds(account.bank, price));
        }

        let balance = self
            .ledger
            .purchase(PurchaseOrder {
                user: *user,
                item,
                price,
                expected_balance: account.bank,
            })
            .await
            .map_err(Self::map_ledger_error)?;

        info!(user = %user, item = %item, price = %price, balance = %balance, "purchase completed");
        Ok(PurchaseReceipt {
            item,
            charged: price,
            balance,
        })
    }

    async fn buy(&self, user: &UserId, item: ItemRef) -> Result<PurchaseReceipt, Error> {
        self.retry
            .run("purchase", || self.attempt(user, item))
            .await
    }
}

#[async_trait]
impl<L, C> PurchaseCommand for PurchaseService<L, C>
where
    L: LedgerRepository,
    C: CatalogRepository,
{
    async fn buy_hero(&self, user: &UserId, hero: &HeroId) -> Result<PurchaseReceipt, Error> {
        self.buy(user, ItemRef::Hero(*hero)).await
    }

    async fn buy_spell(&self, user: &UserId, spell: &SpellId) -> Result<PurchaseReceipt, Error> {
        self.buy(user, ItemRef::Spell(*spell)).await
    }
}

#[cfg(test)]
#[path = "purchase_service_tests.rs"]
mod tests;
