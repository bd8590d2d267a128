//! Integration tests for `DieselLedgerRepository` against embedded PostgreSQL.
//!
//! Every rejected purchase must leave the balance and ownership exactly as
//! they were before the transaction started.

#[path = "support/cluster_skip.rs"]
mod cluster_skip;
#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use arena_backend::domain::ports::{LedgerRepository, LedgerRepositoryError, PurchaseOrder};
use arena_backend::domain::{Coins, HeroId, ItemRef, UserId};
use arena_backend::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};
use cluster_skip::handle_cluster_setup_failure;
use embedded_postgres::{format_postgres_error, provision_database};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

const HERO_PRICE: i64 = 40;

struct TestContext {
    runtime: Runtime,
    repository: DieselLedgerRepository,
    client: Client,
    user: UserId,
    hero: HeroId,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn set_bank(&mut self, bank: i64) {
        self.client
            .execute(
                "UPDATE users SET bank = $2 WHERE id = $1",
                &[self.user.as_uuid(), &bank],
            )
            .map_err(|err| format_postgres_error(&err))
            .expect("bank should update");
    }

    fn grant_hero(&mut self) {
        self.client
            .execute(
                "INSERT INTO user_heroes (user_id, hero_id) VALUES ($1, $2)",
                &[self.user.as_uuid(), self.hero.as_uuid()],
            )
            .map_err(|err| format_postgres_error(&err))
            .expect("ownership should insert");
    }

    fn order(&self, expected_balance: u64) -> PurchaseOrder {
        PurchaseOrder {
            user: self.user,
            item: ItemRef::Hero(self.hero),
            price: Coins::new(HERO_PRICE.unsigned_abs()),
            expected_balance: Coins::new(expected_balance),
        }
    }

    fn balance(&self) -> Coins {
        self.runtime
            .block_on(self.repository.find_account(&self.user))
            .expect("account lookup should succeed")
            .expect("account should exist")
            .bank
    }

    fn owns_hero(&self) -> bool {
        self.runtime
            .block_on(
                self.repository
                    .has_ownership(&self.user, &ItemRef::Hero(self.hero)),
            )
            .expect("ownership lookup should succeed")
    }
}

fn seed(client: &mut Client, user: &UserId, hero: &HeroId) -> Result<(), String> {
    client
        .execute(
            "INSERT INTO users (id, username, email, bank) VALUES ($1, 'ada', 'ada@example.com', 0)",
            &[user.as_uuid()],
        )
        .map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            concat!(
                "INSERT INTO heroes (id, name, hitpoint, damage, cost, damage_tower, speed, price) ",
                "VALUES ($1, 'Knight', 160, 60, 3, 20, 60, $2)"
            ),
            &[hero.as_uuid(), &HERO_PRICE],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_database(&runtime)?;

    let user = UserId::random();
    let hero = HeroId::random();
    let mut client =
        Client::connect(database.url(), NoTls).map_err(|err| format_postgres_error(&err))?;
    seed(&mut client, &user, &hero)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselLedgerRepository::new(pool),
        client,
        user,
        hero,
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn purchase_debits_and_records_ownership(repo_context: Option<TestContext>) {
    let Some(mut context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: purchase_debits_and_records_ownership skipped");
        return;
    };
    context.set_bank(100);

    let remaining = context
        .runtime
        .block_on(context.repository.purchase(context.order(100)))
        .expect("purchase should succeed");

    assert_eq!(remaining, Coins::new(60));
    assert_eq!(context.balance(), Coins::new(60));
    assert!(context.owns_hero());
}

#[rstest]
fn stale_expected_balance_changes_nothing(repo_context: Option<TestContext>) {
    let Some(mut context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: stale_expected_balance_changes_nothing skipped");
        return;
    };
    context.set_bank(100);

    let err = context
        .runtime
        .block_on(context.repository.purchase(context.order(150)))
        .expect_err("stale balance should be rejected");

    assert_eq!(
        err,
        LedgerRepositoryError::balance_changed(150_u64, 100_u64)
    );
    assert_eq!(context.balance(), Coins::new(100));
    assert!(!context.owns_hero());
}

#[rstest]
fn debit_beyond_balance_is_rejected(repo_context: Option<TestContext>) {
    let Some(mut context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: debit_beyond_balance_is_rejected skipped");
        return;
    };
    context.set_bank(30);

    let err = context
        .runtime
        .block_on(context.repository.purchase(context.order(30)))
        .expect_err("short balance should be rejected");

    assert_eq!(err, LedgerRepositoryError::insufficient_funds(30_u64, 40_u64));
    assert_eq!(context.balance(), Coins::new(30));
    assert!(!context.owns_hero());
}

#[rstest]
fn duplicate_ownership_rolls_the_debit_back(repo_context: Option<TestContext>) {
    let Some(mut context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_ownership_rolls_the_debit_back skipped");
        return;
    };
    context.set_bank(100);
    context.grant_hero();

    let err = context
        .runtime
        .block_on(context.repository.purchase(context.order(100)))
        .expect_err("repeat purchase should be rejected");

    assert_eq!(err, LedgerRepositoryError::already_owned());
    assert_eq!(context.balance(), Coins::new(100));
    assert!(context.owns_hero());
}
