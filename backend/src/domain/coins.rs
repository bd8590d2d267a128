//! In-game currency amounts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative amount of in-game currency.
///
/// Balances and prices share this type, so a negative balance is not
/// representable. Debits go through [`Coins::checked_sub`].
///
/// # Examples
/// ```
/// use arena_backend::domain::Coins;
///
/// let bank = Coins::new(100);
/// assert_eq!(bank.checked_sub(Coins::new(60)), Some(Coins::new(40)));
/// assert_eq!(Coins::new(40).checked_sub(Coins::new(50)), None);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = u64)]
pub struct Coins(u64);

impl Coins {
    /// Zero coins.
    pub const ZERO: Self = Self(0);

    /// Largest amount a `BIGINT` column can hold.
    pub const MAX_STORABLE: Self = Self(i64::MAX.unsigned_abs());

    /// Wrap a raw amount.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Raw amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Subtract `price`, returning `None` when the result would be negative.
    #[must_use]
    pub const fn checked_sub(self, price: Self) -> Option<Self> {
        match self.0.checked_sub(price.0) {
            Some(rest) => Some(Self(rest)),
            None => None,
        }
    }

    /// Convert a database `BIGINT`; negative values are rejected.
    pub fn try_from_i64(value: i64) -> Result<Self, std::num::TryFromIntError> {
        u64::try_from(value).map(Self)
    }

    /// Convert to a database `BIGINT`; amounts above
    /// [`Coins::MAX_STORABLE`] are rejected.
    pub fn try_to_i64(self) -> Result<i64, std::num::TryFromIntError> {
        i64::try_from(self.0)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Coins {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
