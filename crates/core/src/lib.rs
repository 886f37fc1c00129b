//! Coinfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the Coinfolio portfolio
//! tracker: holdings valuation, the analytics metrics library, the watchlist,
//! AI insight blocks and the email digest job. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite`, `email` and
//! `ai` crates.

pub mod constants;
pub mod digest;
pub mod errors;
pub mod insights;
pub mod notifications;
pub mod portfolio;
pub mod prices;
pub mod subscriptions;
pub mod users;
pub mod utils;
pub mod watchlist;

// Re-export common portfolio types
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
