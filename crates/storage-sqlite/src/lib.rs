//! SQLite storage implementation for Coinfolio.
//!
//! Implements the repository traits defined in `coinfolio-core` with Diesel
//! over SQLite:
//! - connection pooling and the single-writer actor
//! - embedded Diesel migrations
//! - repositories for users, holdings, digest preferences, subscriptions and
//!   the watchlist
//!
//! This is the only crate that depends on Diesel.

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

pub mod digest;
pub mod holdings;
pub mod subscriptions;
pub mod users;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};

pub use digest::DigestPreferenceRepository;
pub use holdings::HoldingRepository;
pub use subscriptions::SubscriptionRepository;
pub use users::UserRepository;
pub use watchlist::WatchlistRepository;

pub use coinfolio_core::errors::{DatabaseError, Error, Result};
