//! Portfolio analytics: diversification and risk metrics.

mod analytics_model;
mod analytics_service;
pub mod metrics;

pub use analytics_model::{AdvancedMetrics, PortfolioAnalytics, RiskLevel};
pub use analytics_service::{analyze_portfolio, AnalyticsService, AnalyticsServiceTrait};
