use chrono::{NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DIGEST_TOP_MOVERS;
use crate::errors::{Error, ValidationError};
use crate::portfolio::holdings::{percent_of, top_movers, PortfolioSummary, PricedHolding, TopMover};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigestFrequency {
    Daily,
    #[default]
    Weekly,
}

impl DigestFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestFrequency::Daily => "daily",
            DigestFrequency::Weekly => "weekly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DigestFrequency::Daily => "Daily",
            DigestFrequency::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for DigestFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(DigestFrequency::Daily),
            "weekly" => Ok(DigestFrequency::Weekly),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown digest frequency: {}",
                other
            ))
            .into()),
        }
    }
}

/// Per-user digest settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigestPreference {
    pub user_id: String,
    pub digest_enabled: bool,
    pub digest_frequency: DigestFrequency,
    /// UTC. Only written by the digest job.
    pub last_sent_at: Option<NaiveDateTime>,
}

impl DigestPreference {
    /// Settings for a user who never saved any.
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            digest_enabled: true,
            digest_frequency: DigestFrequency::default(),
            last_sent_at: None,
        }
    }
}

/// Partial update from the preferences endpoint. `last_sent_at` is not
/// user-editable.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DigestPreferenceUpdate {
    pub digest_enabled: Option<bool>,
    pub digest_frequency: Option<DigestFrequency>,
}

/// Outcome counts for one run. `total` counts eligible users.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigestRunSummary {
    pub sent: usize,
    pub errors: usize,
    pub total: usize,
}

/// Numbers rendered into one digest email.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigestSnapshot {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
    /// Percent change from cost basis to current value. The email labels this
    /// "24h change" even though it is measured since purchase.
    pub since_purchase_change: Decimal,
    pub holdings_count: usize,
    pub top_movers: Vec<TopMover>,
}

impl DigestSnapshot {
    pub fn from_priced(holdings: &[PricedHolding]) -> Self {
        let summary = PortfolioSummary::from_priced(holdings);
        Self {
            total_value: summary.total_value,
            total_cost: summary.total_cost,
            total_profit_loss: summary.total_profit_loss,
            since_purchase_change: percent_of(summary.total_profit_loss, summary.total_cost),
            holdings_count: summary.holdings_count,
            top_movers: top_movers(holdings, DIGEST_TOP_MOVERS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Base URL for links in the email, without trailing slash.
    pub app_url: String,
    pub from_address: String,
    /// UTC weekday on which weekly digests go out.
    pub weekly_day: Weekday,
    pub insights_enabled: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
            from_address: "Coinfolio <digest@coinfolio.app>".to_string(),
            weekly_day: Weekday::Mon,
            insights_enabled: true,
        }
    }
}
