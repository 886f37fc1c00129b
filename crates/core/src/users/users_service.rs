use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::users_model::{UserProfile, UserProfileInput};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.repository
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.repository.get_user(user_id)
    }

    async fn upsert_user(&self, input: UserProfileInput) -> Result<UserProfile> {
        input.validate()?;
        let now = Utc::now().naive_utc();
        let id = input
            .id
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let display_name = input
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        debug!("Upserting user {}", id);
        self.repository
            .upsert_user(UserProfile {
                id,
                email: input.email.trim().to_lowercase(),
                display_name,
                created_at: now,
                updated_at: now,
            })
            .await
    }
}
