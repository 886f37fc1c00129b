use std::sync::Arc;

use super::subscriptions_model::Subscription;
use super::subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
use crate::errors::Result;

pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl SubscriptionServiceTrait for SubscriptionService {
    fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        self.repository.get_subscription(user_id)
    }

    fn is_pro(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .repository
            .get_subscription(user_id)?
            .is_some_and(|s| s.is_pro()))
    }
}
