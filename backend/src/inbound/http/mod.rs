//! HTTP inbound adapter exposing the REST API.

pub mod catalog;
pub mod decks;
pub mod error;
pub mod health;
pub mod purchases;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
