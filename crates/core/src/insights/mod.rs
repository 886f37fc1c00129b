//! Insight blocks shown in the app and in digest emails.

mod insights_model;
mod insights_service;
mod templated;

pub use insights_model::{Insight, InsightContext, InsightGenerator};
pub use insights_service::{InsightService, InsightServiceTrait};
pub use templated::TemplatedInsightGenerator;
