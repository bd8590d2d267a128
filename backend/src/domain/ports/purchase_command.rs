//! Driving port for buying catalogue items.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Coins, Error, HeroId, ItemRef, SpellId, UserId};

/// Outcome of a purchase.
///
/// Re-buying an owned item succeeds with `charged` equal to zero and the
/// balance untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    /// Item now owned by the buyer.
    #[schema(value_type = Object)]
    pub item: ItemRef,
    /// Amount debited by this call.
    pub charged: Coins,
    /// Balance after the call.
    pub balance: Coins,
}

/// Convert currency into permanent ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseCommand: Send + Sync {
    /// Buy a hero.
    ///
    /// # Errors
    ///
    /// `not_found` for an unknown hero or account, `insufficient_funds` when
    /// the balance cannot cover the price, `conflict` when concurrent
    /// purchases kept invalidating the balance.
    async fn buy_hero(&self, user: &UserId, hero: &HeroId) -> Result<PurchaseReceipt, Error>;

    /// Buy a spell. Same contract as [`PurchaseCommand::buy_hero`].
    async fn buy_spell(&self, user: &UserId, spell: &SpellId) -> Result<PurchaseReceipt, Error>;
}
