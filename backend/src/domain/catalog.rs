//! Purchasable catalogue entries.
//!
//! Heroes and spells are immutable once created. Admin authoring goes through
//! [`HeroDraft`] and [`SpellDraft`], which validate before an identifier is
//! assigned.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Coins, HeroId, SpellId};

/// Maximum length of a catalogue entry name, in characters.
pub const NAME_MAX: usize = 64;

/// Validation failures for catalogue drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    /// Name was blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound that was exceeded.
        max: usize,
    },
    /// A numeric stat was negative.
    #[error("{field} must not be negative")]
    NegativeStat {
        /// Offending field, in wire casing.
        field: &'static str,
    },
    /// Price exceeded what the catalogue can store.
    #[error("price must be at most {max}")]
    PriceTooHigh {
        /// Largest accepted price.
        max: Coins,
    },
}

/// A combat unit that can be bought and slotted into decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Catalogue identifier.
    pub id: HeroId,
    /// Display name.
    pub name: String,
    /// Flavour text.
    pub description: String,
    /// Rarity tier label.
    pub rarity: String,
    /// Damage type label.
    pub damage_type: String,
    /// Effect tag.
    pub effect: String,
    /// Hit points.
    pub hitpoint: i32,
    /// Damage per hit.
    pub damage: i32,
    /// Elixir cost to deploy.
    pub cost: i32,
    /// Damage dealt to towers.
    pub damage_tower: i32,
    /// Movement speed.
    pub speed: i32,
    /// Purchase price.
    pub price: Coins,
}

/// A one-shot effect that can be bought and slotted into decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    /// Catalogue identifier.
    pub id: SpellId,
    /// Display name.
    pub name: String,
    /// Flavour text.
    pub description: String,
    /// Radius of effect.
    pub area: i32,
    /// Damage type label.
    pub damage_type: String,
    /// Damage dealt.
    pub damage: i32,
    /// Effect duration in milliseconds.
    pub duration: i64,
    /// Effect tag.
    pub effect: String,
    /// Purchase price.
    pub price: Coins,
}

/// Unvalidated hero attributes supplied by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroDraft {
    /// Display name; trimmed, non-empty.
    pub name: String,
    /// Flavour text.
    pub description: String,
    /// Rarity tier label.
    pub rarity: String,
    /// Damage type label.
    pub damage_type: String,
    /// Effect tag.
    pub effect: String,
    /// Hit points.
    pub hitpoint: i32,
    /// Damage per hit.
    pub damage: i32,
    /// Elixir cost to deploy.
    pub cost: i32,
    /// Damage dealt to towers.
    pub damage_tower: i32,
    /// Movement speed.
    pub speed: i32,
    /// Purchase price.
    pub price: Coins,
}

impl HeroDraft {
    /// Validate the draft and assign it `id`.
    pub fn into_hero(self, id: HeroId) -> Result<Hero, CatalogValidationError> {
        let name = validate_name(&self.name)?;
        for (field, value) in [
            ("hitpoint", self.hitpoint),
            ("damage", self.damage),
            ("cost", self.cost),
            ("damageTower", self.damage_tower),
            ("speed", self.speed),
        ] {
            non_negative(field, i64::from(value))?;
        }
        let price = storable_price(self.price)?;
        Ok(Hero {
            id,
            name,
            description: self.description.trim().to_owned(),
            rarity: self.rarity.trim().to_owned(),
            damage_type: self.damage_type.trim().to_owned(),
            effect: self.effect.trim().to_owned(),
            hitpoint: self.hitpoint,
            damage: self.damage,
            cost: self.cost,
            damage_tower: self.damage_tower,
            speed: self.speed,
            price,
        })
    }
}

/// Unvalidated spell attributes supplied by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellDraft {
    /// Display name; trimmed, non-empty.
    pub name: String,
    /// Flavour text.
    pub description: String,
    /// Radius of effect.
    pub area: i32,
    /// Damage type label.
    pub damage_type: String,
    /// Damage dealt.
    pub damage: i32,
    /// Effect duration in milliseconds.
    pub duration: i64,
    /// Effect tag.
    pub effect: String,
    /// Purchase price.
    pub price: Coins,
}

impl SpellDraft {
    /// Validate the draft and assign it `id`.
    pub fn into_spell(self, id: SpellId) -> Result<Spell, CatalogValidationError> {
        let name = validate_name(&self.name)?;
        non_negative("area", i64::from(self.area))?;
        non_negative("damage", i64::from(self.damage))?;
        non_negative("duration", self.duration)?;
        let price = storable_price(self.price)?;
        Ok(Spell {
            id,
            name,
            description: self.description.trim().to_owned(),
            area: self.area,
            damage_type: self.damage_type.trim().to_owned(),
            damage: self.damage,
            duration: self.duration,
            effect: self.effect.trim().to_owned(),
            price,
        })
    }
}

fn validate_name(raw: &str) -> Result<String, CatalogValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogValidationError::EmptyName);
    }
    if name.chars().count() > NAME_MAX {
        return Err(CatalogValidationError::NameTooLong { max: NAME_MAX });
    }
    Ok(name.to_owned())
}

fn non_negative(field: &'static str, value: i64) -> Result<(), CatalogValidationError> {
    if value < 0 {
        return Err(CatalogValidationError::NegativeStat { field });
    }
    Ok(())
}

fn storable_price(price: Coins) -> Result<Coins, CatalogValidationError> {
    if price > Coins::MAX_STORABLE {
        return Err(CatalogValidationError::PriceTooHigh {
            max: Coins::MAX_STORABLE,
        });
    }
    Ok(price)
}
