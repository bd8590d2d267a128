//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: a mutex-guarded store used when no database is configured
//!   and by behavioural tests.
//! - **persistence**: PostgreSQL repositories built on Diesel.

pub mod memory;
pub mod persistence;
