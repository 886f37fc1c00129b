use async_trait::async_trait;

use super::users_model::{UserProfile, UserProfileInput};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;
    /// Inserts the profile or replaces email and display name of an existing one.
    async fn upsert_user(&self, profile: UserProfile) -> Result<UserProfile>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<UserProfile>;
    fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>>;
    async fn upsert_user(&self, input: UserProfileInput) -> Result<UserProfile>;
}
