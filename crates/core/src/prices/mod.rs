//! Prices module - cached access to the latest coin quotes.

mod price_service;

pub use price_service::PriceService;
