//! Watchlist module - coins a user follows without holding them.

mod watchlist_model;
mod watchlist_service;
mod watchlist_traits;

pub use watchlist_model::{NewWatchlistItem, WatchlistItem, WatchlistQuote};
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
