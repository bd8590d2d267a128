//! PostgreSQL-backed ledger: balances and ownership facts.
//!
//! A purchase runs in one transaction: the price is re-read, the balance is
//! debited with a compare-and-set `UPDATE`, and the ownership row is inserted.
//! Any rejection rolls the whole transaction back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LedgerRepository, LedgerRepositoryError, PurchaseOrder};
use crate::domain::{Account, Coins, ItemRef, UserId};

use super::error_mapping::{DbFailure, classify};
use super::models::AccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::{heroes, spells, user_heroes, user_spells, users};

/// Diesel implementation of [`LedgerRepository`].
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the purchase transaction.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Rejected(LedgerRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for LedgerRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(error) => map_diesel_error(&error),
            TxError::Rejected(error) => error,
        }
    }
}

fn map_failure(failure: DbFailure) -> LedgerRepositoryError {
    match failure {
        DbFailure::Connection(message) => LedgerRepositoryError::connection(message),
        DbFailure::Contention(message) => LedgerRepositoryError::contention(message),
        // Ownership inserts ignore conflicts, so a unique violation here means
        // a concurrent writer got in first.
        DbFailure::Duplicate(_) => LedgerRepositoryError::already_owned(),
        DbFailure::Query(message) => LedgerRepositoryError::query(message),
    }
}

fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    map_failure(DbFailure::from(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> LedgerRepositoryError {
    map_failure(classify(error))
}

fn coins(raw: i64) -> Result<Coins, LedgerRepositoryError> {
    Coins::try_from_i64(raw).map_err(|_| LedgerRepositoryError::query("negative amount stored"))
}

fn bigint(amount: Coins) -> Result<i64, TxError> {
    amount.try_to_i64().map_err(|_| {
        TxError::Rejected(LedgerRepositoryError::query(format!(
            "amount {amount} exceeds the BIGINT range"
        )))
    })
}

async fn current_price(
    conn: &mut AsyncPgConnection,
    item: &ItemRef,
) -> Result<Option<i64>, diesel::result::Error> {
    match item {
        ItemRef::Hero(id) => {
            heroes::table
                .find(*id.as_uuid())
                .select(heroes::price)
                .first::<i64>(conn)
                .await
                .optional()
        }
        ItemRef::Spell(id) => {
            spells::table
                .find(*id.as_uuid())
                .select(spells::price)
                .first::<i64>(conn)
                .await
                .optional()
        }
    }
}

async fn insert_ownership(
    conn: &mut AsyncPgConnection,
    user: Uuid,
    item: &ItemRef,
) -> Result<usize, diesel::result::Error> {
    match item {
        ItemRef::Hero(id) => {
            diesel::insert_into(user_heroes::table)
                .values((
                    user_heroes::user_id.eq(user),
                    user_heroes::hero_id.eq(*id.as_uuid()),
                ))
                .on_conflict_do_nothing()
                .execute(conn)
                .await
        }
        ItemRef::Spell(id) => {
            diesel::insert_into(user_spells::table)
                .values((
                    user_spells::user_id.eq(user),
                    user_spells::spell_id.eq(*id.as_uuid()),
                ))
                .on_conflict_do_nothing()
                .execute(conn)
                .await
        }
    }
}

/// Explain why the conditional debit matched no row.
async fn explain_rejected_debit(
    conn: &mut AsyncPgConnection,
    order: &PurchaseOrder,
) -> Result<LedgerRepositoryError, TxError> {
    let balance = users::table
        .find(*order.user.as_uuid())
        .select(users::bank)
        .first::<i64>(conn)
        .await
        .optional()?;
    let Some(raw) = balance else {
        return Ok(LedgerRepositoryError::account_not_found());
    };
    let actual = coins(raw).map_err(TxError::Rejected)?;
    if actual == order.expected_balance {
        Ok(LedgerRepositoryError::insufficient_funds(actual, order.price))
    } else {
        Ok(LedgerRepositoryError::balance_changed(
            order.expected_balance,
            actual,
        ))
    }
}

async fn apply_purchase(
    conn: &mut AsyncPgConnection,
    order: PurchaseOrder,
) -> Result<Coins, TxError> {
    let Some(raw_price) = current_price(conn, &order.item).await? else {
        return Err(TxError::Rejected(LedgerRepositoryError::item_not_found()));
    };
    let price = coins(raw_price).map_err(TxError::Rejected)?;
    if price != order.price {
        return Err(TxError::Rejected(LedgerRepositoryError::price_changed(
            order.price,
            price,
        )));
    }

    let debit = bigint(price)?;
    let expected = bigint(order.expected_balance)?;
    let remaining = diesel::update(
        users::table
            .filter(users::id.eq(*order.user.as_uuid()))
            .filter(users::bank.eq(expected))
            .filter(users::bank.ge(debit)),
    )
    .set(users::bank.eq(users::bank - debit))
    .returning(users::bank)
    .get_result::<i64>(conn)
    .await
    .optional()?;
    let Some(remaining) = remaining else {
        let reason = explain_rejected_debit(conn, &order).await?;
        return Err(TxError::Rejected(reason));
    };

    if insert_ownership(conn, *order.user.as_uuid(), &order.item).await? == 0 {
        return Err(TxError::Rejected(LedgerRepositoryError::already_owned()));
    }

    coins(remaining).map_err(TxError::Rejected)
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn find_account(&self, user: &UserId) -> Result<Option<Account>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(*user.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;
        row.map(Account::try_from)
            .transpose()
            .map_err(LedgerRepositoryError::query)
    }

    async fn has_ownership(
        &self,
        user: &UserId,
        item: &ItemRef,
    ) -> Result<bool, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let result = match item {
            ItemRef::Hero(id) => {
                diesel::select(diesel::dsl::exists(
                    user_heroes::table
                        .filter(user_heroes::user_id.eq(user_id))
                        .filter(user_heroes::hero_id.eq(*id.as_uuid())),
                ))
                .get_result::<bool>(&mut conn)
                .await
            }
            ItemRef::Spell(id) => {
                diesel::select(diesel::dsl::exists(
                    user_spells::table
                        .filter(user_spells::user_id.eq(user_id))
                        .filter(user_spells::spell_id.eq(*id.as_uuid())),
                ))
                .get_result::<bool>(&mut conn)
                .await
            }
        };
        result.map_err(|err| map_diesel_error(&err))
    }

    async fn purchase(&self, order: PurchaseOrder) -> Result<Coins, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError, _>(|conn| {
            async move { apply_purchase(conn, order).await }.scope_boxed()
        })
        .await
        .map_err(LedgerRepositoryError::from)
    }
}
