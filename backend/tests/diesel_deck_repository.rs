//! Integration tests for `DieselDeckRepository` against embedded PostgreSQL.
//!
//! Placement serialises on the owner's row, so concurrent placements into
//! the default deck must agree on a single deck.

#[path = "support/cluster_skip.rs"]
mod cluster_skip;
#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use arena_backend::domain::ports::{DeckRepository, DeckRepositoryError};
use arena_backend::domain::{DeckPlacement, DeckTarget, HeroId, ItemRef, UserId};
use arena_backend::outbound::persistence::{DbPool, DieselDeckRepository, PoolConfig};
use cluster_skip::handle_cluster_setup_failure;
use embedded_postgres::{format_postgres_error, provision_database};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

struct TestContext {
    runtime: Runtime,
    repository: DieselDeckRepository,
    user: UserId,
    owned: [HeroId; 2],
    unowned: HeroId,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn place(&self, hero: HeroId) -> DeckPlacement {
        DeckPlacement {
            owner: self.user,
            target: DeckTarget::Default,
            item: ItemRef::Hero(hero),
        }
    }
}

fn insert_hero(client: &mut Client, hero: &HeroId, name: &str) -> Result<(), String> {
    client
        .execute(
            concat!(
                "INSERT INTO heroes (id, name, hitpoint, damage, cost, damage_tower, speed, price) ",
                "VALUES ($1, $2, 100, 50, 3, 10, 60, 40)"
            ),
            &[hero.as_uuid(), &name],
        )
        .map(|_| ())
        .map_err(|err| format_postgres_error(&err))
}

fn seed(
    client: &mut Client,
    user: &UserId,
    owned: &[HeroId; 2],
    unowned: &HeroId,
) -> Result<(), String> {
    client
        .execute(
            "INSERT INTO users (id, username, email, bank) VALUES ($1, 'ada', 'ada@example.com', 0)",
            &[user.as_uuid()],
        )
        .map_err(|err| format_postgres_error(&err))?;
    for (hero, name) in owned.iter().zip(["Knight", "Archer"]) {
        insert_hero(client, hero, name)?;
        client
            .execute(
                "INSERT INTO user_heroes (user_id, hero_id) VALUES ($1, $2)",
                &[user.as_uuid(), hero.as_uuid()],
            )
            .map_err(|err| format_postgres_error(&err))?;
    }
    insert_hero(client, unowned, "Giant")
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_database(&runtime)?;

    let user = UserId::random();
    let owned = [HeroId::random(), HeroId::random()];
    let unowned = HeroId::random();
    let mut client =
        Client::connect(database.url(), NoTls).map_err(|err| format_postgres_error(&err))?;
    seed(&mut client, &user, &owned, &unowned)?;

    // Two connections so both placements can hold a transaction at once.
    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(2));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselDeckRepository::new(pool),
        user,
        owned,
        unowned,
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
fn concurrent_default_placements_share_one_deck(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_default_placements_share_one_deck skipped");
        return;
    };
    let [first, second] = context.owned;
    let first_placement = context.place(first);
    let second_placement = context.place(second);

    let (left, right) = context.runtime.block_on(async {
        tokio::join!(
            context.repository.place_item(&first_placement),
            context.repository.place_item(&second_placement),
        )
    });
    let left = left.expect("first placement should succeed");
    let right = right.expect("second placement should succeed");

    assert_eq!(left, right);
    let decks = context
        .runtime
        .block_on(context.repository.decks_for_user(&context.user))
        .expect("decks should load");
    assert_eq!(decks.len(), 1);
    let deck = decks.first().expect("one deck");
    assert_eq!(deck.id, left);
    assert!(deck.contains(&ItemRef::Hero(first)));
    assert!(deck.contains(&ItemRef::Hero(second)));
}

#[rstest]
fn repeated_default_placement_reuses_the_deck(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: repeated_default_placement_reuses_the_deck skipped");
        return;
    };
    let [hero, _] = context.owned;
    let placement = context.place(hero);

    let first = context
        .runtime
        .block_on(context.repository.place_item(&placement))
        .expect("placement should succeed");
    let again = context
        .runtime
        .block_on(context.repository.place_item(&placement))
        .expect("repeat placement should be a no-op");

    assert_eq!(first, again);
    let deck = context
        .runtime
        .block_on(context.repository.find_deck(&first))
        .expect("deck should load")
        .expect("deck should exist");
    assert_eq!(deck.hero_ids, vec![hero]);
}

#[rstest]
fn unowned_placement_leaves_no_deck_behind(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unowned_placement_leaves_no_deck_behind skipped");
        return;
    };
    let placement = context.place(context.unowned);

    let err = context
        .runtime
        .block_on(context.repository.place_item(&placement))
        .expect_err("unowned hero should be rejected");

    assert_eq!(err, DeckRepositoryError::not_owned());
    let decks = context
        .runtime
        .block_on(context.repository.decks_for_user(&context.user))
        .expect("decks should load");
    assert!(decks.is_empty());
}
