//! PostgreSQL-backed hero and spell catalogue.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{
    Coins, Hero, HeroId, HeroListing, HeroSortKey, SortDirection, Spell, SpellId, SpellListing,
    SpellSortKey, UserId,
};

use super::error_mapping::{DbFailure, classify};
use super::models::{HeroRow, NewHeroRow, NewSpellRow, SpellRow};
use super::pool::{DbPool, PoolError};
use super::schema::{heroes, spells, user_heroes, user_spells};

/// Diesel implementation of [`CatalogRepository`].
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure) -> CatalogRepositoryError {
    match failure {
        DbFailure::Connection(message) => CatalogRepositoryError::connection(message),
        DbFailure::Duplicate(message) => CatalogRepositoryError::duplicate(message),
        DbFailure::Contention(message) | DbFailure::Query(message) => {
            CatalogRepositoryError::query(message)
        }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    map_failure(DbFailure::from(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    map_failure(classify(&error))
}

// Name columns use the "C" collation, so this folds ASCII only and the
// result compares bytewise.
diesel::define_sql_function!(fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text);

fn unstorable_price(price: Coins) -> CatalogRepositoryError {
    CatalogRepositoryError::query(format!("price {price} exceeds the BIGINT range"))
}

fn limit_and_offset(page: &pagination::PageRequest) -> (i64, i64) {
    (
        i64::from(page.page_size()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

fn into_heroes(rows: Vec<HeroRow>) -> Result<Vec<Hero>, CatalogRepositoryError> {
    rows.into_iter()
        .map(Hero::try_from)
        .collect::<Result<_, _>>()
        .map_err(CatalogRepositoryError::query)
}

fn into_spells(rows: Vec<SpellRow>) -> Result<Vec<Spell>, CatalogRepositoryError> {
    rows.into_iter()
        .map(Spell::try_from)
        .collect::<Result<_, _>>()
        .map_err(CatalogRepositoryError::query)
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn find_hero(&self, id: &HeroId) -> Result<Option<Hero>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = heroes::table
            .find(*id.as_uuid())
            .select(HeroRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Hero::try_from)
            .transpose()
            .map_err(CatalogRepositoryError::query)
    }

    async fn find_spell(&self, id: &SpellId) -> Result<Option<Spell>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = spells::table
            .find(*id.as_uuid())
            .select(SpellRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Spell::try_from)
            .transpose()
            .map_err(CatalogRepositoryError::query)
    }

    async fn list_heroes(&self, listing: &HeroListing) -> Result<Vec<Hero>, CatalogRepositoryError> {
        let mut query = heroes::table.select(HeroRow::as_select()).into_boxed();
        if let Some(pattern) = listing.name.like_pattern() {
            query = query.filter(heroes::name.ilike(pattern));
        }
        query = match (listing.sort, listing.direction) {
            (HeroSortKey::Id, SortDirection::Asc) => query.order(heroes::id.asc()),
            (HeroSortKey::Id, SortDirection::Desc) => query.order(heroes::id.desc()),
            (HeroSortKey::Name, SortDirection::Asc) => query.order(lower(heroes::name).asc()),
            (HeroSortKey::Name, SortDirection::Desc) => query.order(lower(heroes::name).desc()),
            (HeroSortKey::Damage, SortDirection::Asc) => query.order(heroes::damage.asc()),
            (HeroSortKey::Damage, SortDirection::Desc) => query.order(heroes::damage.desc()),
            (HeroSortKey::Speed, SortDirection::Asc) => query.order(heroes::speed.asc()),
            (HeroSortKey::Speed, SortDirection::Desc) => query.order(heroes::speed.desc()),
        };
        let (limit, offset) = limit_and_offset(&listing.page);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query
            .then_order_by(heroes::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_heroes(rows)
    }

    async fn list_spells(
        &self,
        listing: &SpellListing,
    ) -> Result<Vec<Spell>, CatalogRepositoryError> {
        let mut query = spells::table.select(SpellRow::as_select()).into_boxed();
        if let Some(pattern) = listing.name.like_pattern() {
            query = query.filter(spells::name.ilike(pattern));
        }
        query = match (listing.sort, listing.direction) {
            (SpellSortKey::Id, SortDirection::Asc) => query.order(spells::id.asc()),
            (SpellSortKey::Id, SortDirection::Desc) => query.order(spells::id.desc()),
            (SpellSortKey::Name, SortDirection::Asc) => query.order(lower(spells::name).asc()),
            (SpellSortKey::Name, SortDirection::Desc) => query.order(lower(spells::name).desc()),
            (SpellSortKey::Damage, SortDirection::Asc) => query.order(spells::damage.asc()),
            (SpellSortKey::Damage, SortDirection::Desc) => query.order(spells::damage.desc()),
        };
        let (limit, offset) = limit_and_offset(&listing.page);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query
            .then_order_by(spells::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_spells(rows)
    }

    async fn owned_heroes(&self, user: &UserId) -> Result<Vec<Hero>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = user_heroes::table
            .inner_join(heroes::table)
            .filter(user_heroes::user_id.eq(*user.as_uuid()))
            .select(HeroRow::as_select())
            .order((lower(heroes::name).asc(), heroes::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_heroes(rows)
    }

    async fn owned_spells(&self, user: &UserId) -> Result<Vec<Spell>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = user_spells::table
            .inner_join(spells::table)
            .filter(user_spells::user_id.eq(*user.as_uuid()))
            .select(SpellRow::as_select())
            .order((lower(spells::name).asc(), spells::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_spells(rows)
    }

    async fn insert_hero(&self, hero: &Hero) -> Result<(), CatalogRepositoryError> {
        let row = NewHeroRow::try_from(hero).map_err(|_| unstorable_price(hero.price))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(heroes::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn insert_spell(&self, spell: &Spell) -> Result<(), CatalogRepositoryError> {
        let row = NewSpellRow::try_from(spell).map_err(|_| unstorable_price(spell.price))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(spells::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
