//! Holdings repository over the `user_portfolios` table.

mod model;
mod repository;

pub use model::HoldingDB;
pub use repository::HoldingRepository;
