use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use super::digest_model::{
    DigestFrequency, DigestPreference, DigestPreferenceUpdate, DigestRunSummary,
};
use crate::errors::Result;

/// Trait for digest preference repository operations
#[async_trait]
pub trait DigestPreferenceRepositoryTrait: Send + Sync {
    /// Preferences with digests switched on.
    fn list_enabled(&self) -> Result<Vec<DigestPreference>>;
    fn get_preference(&self, user_id: &str) -> Result<Option<DigestPreference>>;
    /// Writes enabled flag and frequency; an existing `last_sent_at` is kept.
    async fn upsert_preference(
        &self,
        user_id: &str,
        digest_enabled: bool,
        digest_frequency: DigestFrequency,
    ) -> Result<DigestPreference>;
    async fn mark_sent(&self, user_id: &str, sent_at: NaiveDateTime) -> Result<()>;
}

/// Trait for digest service operations
#[async_trait]
pub trait DigestServiceTrait: Send + Sync {
    /// Runs one digest pass over every enabled user.
    async fn send_digests(&self, now: DateTime<Utc>) -> Result<DigestRunSummary>;
    fn get_preference(&self, user_id: &str) -> Result<DigestPreference>;
    async fn update_preference(
        &self,
        user_id: &str,
        update: DigestPreferenceUpdate,
    ) -> Result<DigestPreference>;
}
