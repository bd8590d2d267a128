//! Port for balances and ownership facts.
//!
//! The ledger owns the two facts a purchase mutates: the account balance and
//! the "user owns item" record. [`LedgerRepository::purchase`] applies both
//! as one unit; adapters must never persist one without the other.

use async_trait::async_trait;

use crate::domain::{Account, Coins, ItemRef, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger adapters.
    pub enum LedgerRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ledger query failed: {message}",
        /// The balance moved since it was read; nothing was written.
        BalanceChanged { expected: Coins, actual: Coins } =>
            "balance changed: expected {expected}, found {actual}",
        /// The catalogue price moved since it was read; nothing was written.
        PriceChanged { expected: Coins, actual: Coins } =>
            "price changed: expected {expected}, found {actual}",
        /// The balance cannot cover the price; nothing was written.
        InsufficientFunds { balance: Coins, price: Coins } =>
            "balance {balance} cannot cover price {price}",
        /// The user already owns the item; nothing was written.
        AlreadyOwned => "item already owned",
        /// The purchasing account does not exist.
        AccountNotFound => "account not found",
        /// The purchased item does not exist.
        ItemNotFound => "item not found",
        /// The store aborted the unit because of a concurrent writer.
        Contention { message: String } => "ledger contention: {message}",
    }
}

/// A purchase as observed by the service.
///
/// The adapter only applies it if both `expected_balance` and `price` still
/// hold inside its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseOrder {
    /// Buyer.
    pub user: UserId,
    /// Item being bought.
    pub item: ItemRef,
    /// Catalogue price the service read.
    pub price: Coins,
    /// Balance the service read.
    pub expected_balance: Coins,
}

/// Balance and ownership storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Fetch an account with its current balance.
    async fn find_account(&self, user: &UserId) -> Result<Option<Account>, LedgerRepositoryError>;

    /// Whether `user` has purchased `item`.
    async fn has_ownership(
        &self,
        user: &UserId,
        item: &ItemRef,
    ) -> Result<bool, LedgerRepositoryError>;

    /// Debit the price and record ownership atomically.
    ///
    /// Returns the balance after the debit. Fails without side effects when
    /// the balance or price drifted from the order, the balance is too low,
    /// or the user already owns the item.
    async fn purchase(&self, order: PurchaseOrder) -> Result<Coins, LedgerRepositoryError>;
}
