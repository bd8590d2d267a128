//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types live next to the rows and reject values the schema constraints
//! should have made impossible.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Account, Coins, Deck, DeckId, Hero, HeroId, Spell, SpellId, UserId, UserRole,
};

use super::schema::{decks, heroes, spells, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bank: i64,
    pub awards: i32,
    pub role: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = String;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let bank = Coins::try_from_i64(row.bank)
            .map_err(|_| format!("account {} has a negative balance", row.id))?;
        let awards = u32::try_from(row.awards)
            .map_err(|_| format!("account {} has a negative award count", row.id))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            bank,
            awards,
            role: UserRole::from_db(&row.role),
        })
    }
}

/// Row read from `heroes`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = heroes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HeroRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rarity: String,
    pub damage_type: String,
    pub effect: String,
    pub hitpoint: i32,
    pub damage: i32,
    pub cost: i32,
    pub damage_tower: i32,
    pub speed: i32,
    pub price: i64,
}

impl TryFrom<HeroRow> for Hero {
    type Error = String;

    fn try_from(row: HeroRow) -> Result<Self, Self::Error> {
        let price = Coins::try_from_i64(row.price)
            .map_err(|_| format!("hero {} has a negative price", row.id))?;
        Ok(Self {
            id: HeroId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            rarity: row.rarity,
            damage_type: row.damage_type,
            effect: row.effect,
            hitpoint: row.hitpoint,
            damage: row.damage,
            cost: row.cost,
            damage_tower: row.damage_tower,
            speed: row.speed,
            price,
        })
    }
}

/// Insertable hero.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = heroes)]
pub(crate) struct NewHeroRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub rarity: &'a str,
    pub damage_type: &'a str,
    pub effect: &'a str,
    pub hitpoint: i32,
    pub damage: i32,
    pub cost: i32,
    pub damage_tower: i32,
    pub speed: i32,
    pub price: i64,
}

impl<'a> TryFrom<&'a Hero> for NewHeroRow<'a> {
    type Error = std::num::TryFromIntError;

    fn try_from(hero: &'a Hero) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *hero.id.as_uuid(),
            name: &hero.name,
            description: &hero.description,
            rarity: &hero.rarity,
            damage_type: &hero.damage_type,
            effect: &hero.effect,
            hitpoint: hero.hitpoint,
            damage: hero.damage,
            cost: hero.cost,
            damage_tower: hero.damage_tower,
            speed: hero.speed,
            price: hero.price.try_to_i64()?,
        })
    }
}

/// Row read from `spells`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = spells)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpellRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub area: i32,
    pub damage_type: String,
    pub damage: i32,
    pub duration: i64,
    pub effect: String,
    pub price: i64,
}

impl TryFrom<SpellRow> for Spell {
    type Error = String;

    fn try_from(row: SpellRow) -> Result<Self, Self::Error> {
        let price = Coins::try_from_i64(row.price)
            .map_err(|_| format!("spell {} has a negative price", row.id))?;
        Ok(Self {
            id: SpellId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            area: row.area,
            damage_type: row.damage_type,
            damage: row.damage,
            duration: row.duration,
            effect: row.effect,
            price,
        })
    }
}

/// Insertable spell.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = spells)]
pub(crate) struct NewSpellRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub area: i32,
    pub damage_type: &'a str,
    pub damage: i32,
    pub duration: i64,
    pub effect: &'a str,
    pub price: i64,
}

impl<'a> TryFrom<&'a Spell> for NewSpellRow<'a> {
    type Error = std::num::TryFromIntError;

    fn try_from(spell: &'a Spell) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *spell.id.as_uuid(),
            name: &spell.name,
            description: &spell.description,
            area: spell.area,
            damage_type: &spell.damage_type,
            damage: spell.damage,
            duration: spell.duration,
            effect: &spell.effect,
            price: spell.price.try_to_i64()?,
        })
    }
}

/// Row read from `decks`, before membership is attached.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeckRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl DeckRow {
    /// Attach membership lists to the deck header.
    pub(crate) fn into_deck(self, hero_ids: Vec<HeroId>, spell_ids: Vec<SpellId>) -> Deck {
        Deck {
            id: DeckId::from_uuid(self.id),
            owner: UserId::from_uuid(self.user_id),
            name: self.name,
            description: self.description,
            hero_ids,
            spell_ids,
            created_at: self.created_at,
        }
    }
}

/// Insertable deck header.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = decks)]
pub(crate) struct NewDeckRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
}
