//! Domain primitives, ports and services.
//!
//! Purpose: define the card-market economy independently of transport and
//! storage. Types are immutable values; invariants and serialisation
//! contracts are documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Account, Hero, Spell, Deck: entities read and written by the services.
//! - PurchaseService, DeckService, CatalogService: implementations of the
//!   driving ports in [`ports`].

pub mod catalog;
mod catalog_service;
pub mod coins;
pub mod deck;
mod deck_service;
pub mod error;
pub mod ids;
pub mod item;
pub mod listing;
pub mod ports;
mod purchase_service;
pub mod retry;
pub mod trace_id;
pub mod user;

pub use self::catalog::{CatalogValidationError, Hero, HeroDraft, NAME_MAX, Spell, SpellDraft};
pub use self::catalog_service::CatalogService;
pub use self::coins::Coins;
pub use self::deck::{
    DECK_NAME_MAX, DEFAULT_DECK_NAME, Deck, DeckDraft, DeckPlacement, DeckTarget,
    DeckValidationError, NewDeck,
};
pub use self::deck_service::DeckService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{DeckId, HeroId, InvalidId, SpellId, UserId};
pub use self::item::{ItemKind, ItemRef};
pub use self::listing::{
    HeroListing, HeroSortKey, NameFilter, SortDirection, SpellListing, SpellSortKey,
};
pub use self::purchase_service::PurchaseService;
pub use self::retry::RetryPolicy;
pub use self::trace_id::TraceId;
pub use self::user::{Account, UserRole};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use arena_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
