//! Users module - profile lookups standing in for the auth provider.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{UserProfile, UserProfileInput};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
