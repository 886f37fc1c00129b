use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

use super::digest_model::{
    DigestConfig, DigestPreference, DigestPreferenceUpdate, DigestRunSummary, DigestSnapshot,
};
use super::digest_render::render_digest_email;
use super::digest_traits::{DigestPreferenceRepositoryTrait, DigestServiceTrait};
use super::eligibility::evaluate_eligibility;
use crate::errors::Result;
use crate::insights::{Insight, InsightContext, TemplatedInsightGenerator};
use crate::notifications::EmailSender;
use crate::portfolio::holdings::{price_holdings, HoldingRepositoryTrait};
use crate::prices::PriceService;
use crate::subscriptions::SubscriptionServiceTrait;
use crate::users::UserRepositoryTrait;

enum UserOutcome {
    Sent,
    Skipped(&'static str),
}

pub struct DigestService {
    preference_repository: Arc<dyn DigestPreferenceRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    subscription_service: Arc<dyn SubscriptionServiceTrait>,
    price_service: Arc<PriceService>,
    email_sender: Arc<dyn EmailSender>,
    config: DigestConfig,
}

impl DigestService {
    pub fn new(
        preference_repository: Arc<dyn DigestPreferenceRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        subscription_service: Arc<dyn SubscriptionServiceTrait>,
        price_service: Arc<PriceService>,
        email_sender: Arc<dyn EmailSender>,
        config: DigestConfig,
    ) -> Self {
        Self {
            preference_repository,
            user_repository,
            holding_repository,
            subscription_service,
            price_service,
            email_sender,
            config,
        }
    }

    fn is_pro(&self, user_id: &str) -> bool {
        match self.subscription_service.is_pro(user_id) {
            Ok(is_pro) => is_pro,
            Err(e) => {
                warn!(
                    "Subscription lookup failed for user {}, treating as free: {}",
                    user_id, e
                );
                false
            }
        }
    }

    async fn process_user(
        &self,
        preference: &DigestPreference,
        is_pro: bool,
        now: DateTime<Utc>,
    ) -> Result<UserOutcome> {
        let user_id = preference.user_id.as_str();

        let Some(user) = self.user_repository.get_user(user_id)? else {
            return Ok(UserOutcome::Skipped("no user profile"));
        };
        let holdings = self.holding_repository.list_holdings(user_id)?;
        if holdings.is_empty() {
            return Ok(UserOutcome::Skipped("no holdings"));
        }

        let coin_ids: Vec<String> = holdings.iter().map(|h| h.coin_id.clone()).collect();
        let prices = self.price_service.get_prices_or_zero(&coin_ids).await;
        let priced = price_holdings(holdings, &prices);
        let snapshot = DigestSnapshot::from_priced(&priced);

        let insight = if !self.config.insights_enabled {
            Insight::None
        } else if is_pro {
            TemplatedInsightGenerator::summarize(&InsightContext::from_priced(
                &priced,
                now.date_naive(),
            ))
        } else {
            Insight::Basic
        };

        let message = render_digest_email(
            &user,
            &snapshot,
            &insight,
            preference.digest_frequency,
            &self.config,
        );
        self.email_sender.send(&message).await?;
        self.preference_repository
            .mark_sent(user_id, now.naive_utc())
            .await?;
        Ok(UserOutcome::Sent)
    }
}

#[async_trait]
impl DigestServiceTrait for DigestService {
    async fn send_digests(&self, now: DateTime<Utc>) -> Result<DigestRunSummary> {
        let preferences = self.preference_repository.list_enabled()?;
        let mut summary = DigestRunSummary::default();

        for preference in &preferences {
            let user_id = preference.user_id.as_str();
            let is_pro = self.is_pro(user_id);
            let eligibility = evaluate_eligibility(preference, is_pro, now, self.config.weekly_day);
            if !eligibility.is_eligible() {
                debug!("Skipping digest for user {}: {:?}", user_id, eligibility);
                continue;
            }
            summary.total += 1;

            match self.process_user(preference, is_pro, now).await {
                Ok(UserOutcome::Sent) => {
                    debug!("Digest sent to user {}", user_id);
                    summary.sent += 1;
                }
                Ok(UserOutcome::Skipped(reason)) => {
                    debug!("Skipping digest for user {}: {}", user_id, reason);
                }
                Err(e) => {
                    warn!("Digest failed for user {}: {}", user_id, e);
                    summary.errors += 1;
                }
            }
        }

        info!(
            "Digest run complete: {} sent, {} errors, {} eligible of {} enabled",
            summary.sent,
            summary.errors,
            summary.total,
            preferences.len()
        );
        Ok(summary)
    }

    fn get_preference(&self, user_id: &str) -> Result<DigestPreference> {
        Ok(self
            .preference_repository
            .get_preference(user_id)?
            .unwrap_or_else(|| DigestPreference::default_for(user_id)))
    }

    async fn update_preference(
        &self,
        user_id: &str,
        update: DigestPreferenceUpdate,
    ) -> Result<DigestPreference> {
        let current = self.get_preference(user_id)?;
        self.preference_repository
            .upsert_preference(
                user_id,
                update.digest_enabled.unwrap_or(current.digest_enabled),
                update.digest_frequency.unwrap_or(current.digest_frequency),
            )
            .await
    }
}
