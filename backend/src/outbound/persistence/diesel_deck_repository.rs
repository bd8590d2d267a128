//! PostgreSQL-backed decks and deck membership.
//!
//! Placement locks the owner's `users` row for the duration of the
//! transaction. Concurrent placements for the same user therefore serialise,
//! which keeps "create the default deck if none exists" from racing.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DeckRepository, DeckRepositoryError};
use crate::domain::{Deck, DeckId, DeckPlacement, DeckTarget, HeroId, ItemRef, NewDeck, SpellId, UserId};

use super::error_mapping::{DbFailure, classify};
use super::models::{DeckRow, NewDeckRow};
use super::pool::{DbPool, PoolError};
use super::schema::{deck_heroes, deck_spells, decks, user_heroes, user_spells, users};

/// Diesel implementation of [`DeckRepository`].
#[derive(Clone)]
pub struct DieselDeckRepository {
    pool: DbPool,
}

impl DieselDeckRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Rejected(DeckRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for DeckRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(error) => map_diesel_error(&error),
            TxError::Rejected(error) => error,
        }
    }
}

fn map_failure(failure: DbFailure) -> DeckRepositoryError {
    match failure {
        DbFailure::Connection(message) => DeckRepositoryError::connection(message),
        DbFailure::Contention(message) | DbFailure::Duplicate(message) => {
            DeckRepositoryError::contention(message)
        }
        DbFailure::Query(message) => DeckRepositoryError::query(message),
    }
}

fn map_pool_error(error: PoolError) -> DeckRepositoryError {
    map_failure(DbFailure::from(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> DeckRepositoryError {
    map_failure(classify(error))
}

/// Load membership for `rows` and assemble full decks, preserving row order.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<DeckRow>,
) -> Result<Vec<Deck>, diesel::result::Error> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let hero_members: Vec<(Uuid, Uuid)> = deck_heroes::table
        .filter(deck_heroes::deck_id.eq_any(&ids))
        .select((deck_heroes::deck_id, deck_heroes::hero_id))
        .order((deck_heroes::added_at.asc(), deck_heroes::hero_id.asc()))
        .load(conn)
        .await?;
    let spell_members: Vec<(Uuid, Uuid)> = deck_spells::table
        .filter(deck_spells::deck_id.eq_any(&ids))
        .select((deck_spells::deck_id, deck_spells::spell_id))
        .order((deck_spells::added_at.asc(), deck_spells::spell_id.asc()))
        .load(conn)
        .await?;

    let mut heroes: HashMap<Uuid, Vec<HeroId>> = HashMap::new();
    for (deck, hero) in hero_members {
        heroes.entry(deck).or_default().push(HeroId::from_uuid(hero));
    }
    let mut spells: HashMap<Uuid, Vec<SpellId>> = HashMap::new();
    for (deck, spell) in spell_members {
        spells.entry(deck).or_default().push(SpellId::from_uuid(spell));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let hero_ids = heroes.remove(&row.id).unwrap_or_default();
            let spell_ids = spells.remove(&row.id).unwrap_or_default();
            row.into_deck(hero_ids, spell_ids)
        })
        .collect())
}

async fn insert_deck(
    conn: &mut AsyncPgConnection,
    deck: &NewDeck,
) -> Result<DeckRow, diesel::result::Error> {
    diesel::insert_into(decks::table)
        .values(NewDeckRow {
            id: *DeckId::random().as_uuid(),
            user_id: *deck.owner.as_uuid(),
            name: &deck.name,
            description: &deck.description,
        })
        .returning(DeckRow::as_returning())
        .get_result(conn)
        .await
}

async fn owns_item(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    item: &ItemRef,
) -> Result<bool, diesel::result::Error> {
    match item {
        ItemRef::Hero(id) => {
            diesel::select(diesel::dsl::exists(
                user_heroes::table
                    .filter(user_heroes::user_id.eq(owner))
                    .filter(user_heroes::hero_id.eq(*id.as_uuid())),
            ))
            .get_result(conn)
            .await
        }
        ItemRef::Spell(id) => {
            diesel::select(diesel::dsl::exists(
                user_spells::table
                    .filter(user_spells::user_id.eq(owner))
                    .filter(user_spells::spell_id.eq(*id.as_uuid())),
            ))
            .get_result(conn)
            .await
        }
    }
}

async fn resolve_target(
    conn: &mut AsyncPgConnection,
    owner: &UserId,
    target: DeckTarget,
) -> Result<Uuid, TxError> {
    let owner_id = *owner.as_uuid();
    match target {
        DeckTarget::Existing(id) => decks::table
            .filter(decks::id.eq(*id.as_uuid()))
            .filter(decks::user_id.eq(owner_id))
            .select(decks::id)
            .first::<Uuid>(conn)
            .await
            .optional()?
            .ok_or_else(|| TxError::Rejected(DeckRepositoryError::deck_not_found())),
        DeckTarget::Default => {
            let oldest = decks::table
                .filter(decks::user_id.eq(owner_id))
                .select(decks::id)
                .order((decks::created_at.asc(), decks::id.asc()))
                .first::<Uuid>(conn)
                .await
                .optional()?;
            match oldest {
                Some(id) => Ok(id),
                None => Ok(insert_deck(conn, &NewDeck::default_for(*owner)).await?.id),
            }
        }
        DeckTarget::New => Ok(insert_deck(conn, &NewDeck::default_for(*owner)).await?.id),
    }
}

async fn insert_membership(
    conn: &mut AsyncPgConnection,
    deck: Uuid,
    item: &ItemRef,
) -> Result<(), diesel::result::Error> {
    match item {
        ItemRef::Hero(id) => {
            diesel::insert_into(deck_heroes::table)
                .values((
                    deck_heroes::deck_id.eq(deck),
                    deck_heroes::hero_id.eq(*id.as_uuid()),
                ))
                .on_conflict_do_nothing()
                .execute(conn)
                .await?;
        }
        ItemRef::Spell(id) => {
            diesel::insert_into(deck_spells::table)
                .values((
                    deck_spells::deck_id.eq(deck),
                    deck_spells::spell_id.eq(*id.as_uuid()),
                ))
                .on_conflict_do_nothing()
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

async fn apply_placement(
    conn: &mut AsyncPgConnection,
    placement: DeckPlacement,
) -> Result<DeckId, TxError> {
    let owner = *placement.owner.as_uuid();
    let locked = users::table
        .find(owner)
        .select(users::id)
        .for_update()
        .first::<Uuid>(conn)
        .await
        .optional()?;
    if locked.is_none() || !owns_item(conn, owner, &placement.item).await? {
        return Err(TxError::Rejected(DeckRepositoryError::not_owned()));
    }

    let deck = resolve_target(conn, &placement.owner, placement.target).await?;
    insert_membership(conn, deck, &placement.item).await?;
    Ok(DeckId::from_uuid(deck))
}

#[async_trait]
impl DeckRepository for DieselDeckRepository {
    async fn find_deck(&self, id: &DeckId) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = decks::table
            .find(*id.as_uuid())
            .select(DeckRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut assembled = assemble(&mut conn, vec![row])
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(assembled.pop())
    }

    async fn create_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = insert_deck(&mut conn, deck)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(row.into_deck(Vec::new(), Vec::new()))
    }

    async fn decks_for_user(&self, user: &UserId) -> Result<Vec<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = decks::table
            .filter(decks::user_id.eq(*user.as_uuid()))
            .select(DeckRow::as_select())
            .order((decks::created_at.asc(), decks::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        assemble(&mut conn, rows)
            .await
            .map_err(|err| map_diesel_error(&err))
    }

    async fn place_item(&self, placement: &DeckPlacement) -> Result<DeckId, DeckRepositoryError> {
        let placement = *placement;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError, _>(|conn| {
            async move { apply_placement(conn, placement).await }.scope_boxed()
        })
        .await
        .map_err(DeckRepositoryError::from)
    }

    async fn remove_item(&self, deck: &DeckId, item: &ItemRef) -> Result<(), DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deck_id = *deck.as_uuid();
        let removed = match item {
            ItemRef::Hero(id) => {
                diesel::delete(
                    deck_heroes::table
                        .filter(deck_heroes::deck_id.eq(deck_id))
                        .filter(deck_heroes::hero_id.eq(*id.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
            ItemRef::Spell(id) => {
                diesel::delete(
                    deck_spells::table
                        .filter(deck_spells::deck_id.eq(deck_id))
                        .filter(deck_spells::spell_id.eq(*id.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(|err| map_diesel_error(&err))?;
        if removed > 0 {
            return Ok(());
        }

        let exists = diesel::select(diesel::dsl::exists(
            decks::table.filter(decks::id.eq(deck_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|err| map_diesel_error(&err))?;
        if exists {
            Ok(())
        } else {
            Err(DeckRepositoryError::deck_not_found())
        }
    }
}
