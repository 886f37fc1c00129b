//! Portfolio module - holdings valuation and analytics.

pub mod analytics;
pub mod holdings;

pub use analytics::*;
pub use holdings::*;
