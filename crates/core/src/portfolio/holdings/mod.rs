//! Holdings module - domain models, services, and traits.

mod holdings_model;
mod holdings_service;
mod holdings_traits;

#[cfg(test)]
mod holdings_service_tests;

pub use holdings_model::{
    price_holdings, top_movers, Holding, NewHolding, PortfolioSummary, PortfolioValuation,
    PricedHolding, TopMover,
};
pub(crate) use holdings_model::{percent_of, saturating_sum};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
