use super::subscriptions_model::Subscription;
use crate::errors::Result;

/// Trait for subscription repository operations
pub trait SubscriptionRepositoryTrait: Send + Sync {
    /// `None` when the user has no subscription row.
    fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>>;
}

/// Trait for subscription service operations
pub trait SubscriptionServiceTrait: Send + Sync {
    fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>>;
    fn is_pro(&self, user_id: &str) -> Result<bool>;
}
