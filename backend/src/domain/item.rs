//! References to purchasable items.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{HeroId, SpellId};

/// Kind of purchasable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A hero card.
    Hero,
    /// A spell card.
    Spell,
}

impl ItemKind {
    /// Lower-case label used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Spell => "spell",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed reference to one hero or spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    /// Reference to a hero.
    Hero(HeroId),
    /// Reference to a spell.
    Spell(SpellId),
}

impl ItemRef {
    /// Discriminant of the reference.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Hero(_) => ItemKind::Hero,
            Self::Spell(_) => ItemKind::Spell,
        }
    }

    /// Underlying UUID regardless of kind.
    #[must_use]
    pub const fn uuid(&self) -> &uuid::Uuid {
        match self {
            Self::Hero(id) => id.as_uuid(),
            Self::Spell(id) => id.as_uuid(),
        }
    }
}

impl From<HeroId> for ItemRef {
    fn from(value: HeroId) -> Self {
        Self::Hero(value)
    }
}

impl From<SpellId> for ItemRef {
    fn from(value: SpellId) -> Self {
        Self::Spell(value)
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.uuid())
    }
}
