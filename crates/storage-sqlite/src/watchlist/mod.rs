mod model;
mod repository;

pub use model::WatchlistItemDB;
pub use repository::WatchlistRepository;
