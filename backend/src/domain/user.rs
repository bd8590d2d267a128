//! Account data relevant to the economy.
//!
//! Credentials, email verification and login live in the account subsystem;
//! this module only models what purchases and admin checks read.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Coins, UserId};

/// Authorisation role attached to an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular player.
    #[default]
    User,
    /// May author catalogue entries.
    Admin,
}

impl UserRole {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse the database representation; unknown roles grant nothing.
    #[must_use]
    pub fn from_db(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// A player account with its currency balance.
///
/// ## Invariants
/// - `bank` is never negative; [`Coins`] cannot represent a negative amount.
/// - `role` changes only through account management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable account identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    /// Spendable balance.
    pub bank: Coins,
    /// Trophy counter.
    pub awards: u32,
    /// Authorisation role.
    pub role: UserRole,
}

impl Account {
    /// Build a regular account with an empty trophy cabinet.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>, bank: Coins) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            bank,
            awards: 0,
            role: UserRole::User,
        }
    }

    /// Return the account with the given role.
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Whether the account may author catalogue entries.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
