//! Subscriptions module - plan lookups used for feature gating.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;

pub use subscriptions_model::{Subscription, SubscriptionPlan, SubscriptionStatus};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
