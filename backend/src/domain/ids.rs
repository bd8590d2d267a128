//! UUID-backed identifiers for accounts, catalogue items and decks.
//!
//! Each identifier is a distinct newtype so a hero id can never be passed
//! where a spell or deck id is expected. All of them serialise as hyphenated
//! UUID strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidId {
    kind: &'static str,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse a textual identifier.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidId> {
                raw.as_ref().parse()
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim() != s {
                    return Err(InvalidId { kind: $label });
                }
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| InvalidId { kind: $label })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(
    /// Opaque identity of an authenticated account.
    UserId,
    "user id"
);
define_id!(
    /// Identifier of a hero in the catalogue.
    HeroId,
    "hero id"
);
define_id!(
    /// Identifier of a spell in the catalogue.
    SpellId,
    "spell id"
);
define_id!(
    /// Identifier of a user's deck.
    DeckId,
    "deck id"
);
