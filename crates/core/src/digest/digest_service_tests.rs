use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use coinfolio_market_data::{CoinQuote, MarketDataError, NoopPriceCache, PriceProvider};

use super::*;
use crate::errors::{Error, Result};
use crate::notifications::{EmailMessage, EmailSender};
use crate::portfolio::holdings::{Holding, HoldingRepositoryTrait, NewHolding};
use crate::prices::PriceService;
use crate::subscriptions::{
    Subscription, SubscriptionPlan, SubscriptionService, SubscriptionRepositoryTrait,
    SubscriptionStatus,
};
use crate::users::{UserProfile, UserRepositoryTrait};

// 2024-01-08 is a Monday.
fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()
}

// ---------- mocks ----------

#[derive(Default)]
struct MockPreferenceRepository {
    prefs: Mutex<HashMap<String, DigestPreference>>,
}

impl MockPreferenceRepository {
    fn with(prefs: Vec<DigestPreference>) -> Self {
        Self {
            prefs: Mutex::new(prefs.into_iter().map(|p| (p.user_id.clone(), p)).collect()),
        }
    }

    fn last_sent(&self, user_id: &str) -> Option<NaiveDateTime> {
        self.prefs.lock().unwrap()[user_id].last_sent_at
    }
}

#[async_trait]
impl DigestPreferenceRepositoryTrait for MockPreferenceRepository {
    fn list_enabled(&self) -> Result<Vec<DigestPreference>> {
        let mut prefs: Vec<DigestPreference> = self
            .prefs
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.digest_enabled)
            .cloned()
            .collect();
        prefs.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(prefs)
    }

    fn get_preference(&self, user_id: &str) -> Result<Option<DigestPreference>> {
        Ok(self.prefs.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert_preference(
        &self,
        user_id: &str,
        digest_enabled: bool,
        digest_frequency: DigestFrequency,
    ) -> Result<DigestPreference> {
        let mut prefs = self.prefs.lock().unwrap();
        let entry = prefs
            .entry(user_id.to_string())
            .or_insert_with(|| DigestPreference::default_for(user_id));
        entry.digest_enabled = digest_enabled;
        entry.digest_frequency = digest_frequency;
        Ok(entry.clone())
    }

    async fn mark_sent(&self, user_id: &str, sent_at: NaiveDateTime) -> Result<()> {
        let mut prefs = self.prefs.lock().unwrap();
        match prefs.get_mut(user_id) {
            Some(p) => {
                p.last_sent_at = Some(sent_at);
                Ok(())
            }
            None => Err(Error::NotFound(user_id.to_string())),
        }
    }
}

#[derive(Default)]
struct MockUserRepository {
    users: HashMap<String, UserProfile>,
}

impl MockUserRepository {
    fn with_users(ids: &[&str]) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            users: ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        UserProfile {
                            id: id.to_string(),
                            email: format!("{}@example.com", id),
                            display_name: None,
                            created_at: now,
                            updated_at: now,
                        },
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.get(user_id).cloned())
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<UserProfile> {
        Ok(profile)
    }
}

#[derive(Default)]
struct MockHoldingRepository {
    holdings: Vec<Holding>,
}

impl MockHoldingRepository {
    fn add(mut self, user_id: &str, coin_id: &str, quantity: Decimal, price: Decimal) -> Self {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        self.holdings.push(Holding {
            id: format!("{}-{}", user_id, coin_id),
            user_id: user_id.to_string(),
            coin_id: coin_id.to_string(),
            coin_name: coin_id.to_string(),
            coin_symbol: coin_id.to_uppercase(),
            quantity,
            purchase_price: price,
            purchase_date: date,
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
        });
        self
    }
}

#[async_trait]
impl HoldingRepositoryTrait for MockHoldingRepository {
    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        Ok(self
            .holdings
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_holding(&self, _user_id: &str, _new_holding: NewHolding) -> Result<Holding> {
        unimplemented!()
    }

    async fn delete_holding(&self, _user_id: &str, _holding_id: &str) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct MockSubscriptionRepository {
    subs: HashMap<String, Subscription>,
}

impl MockSubscriptionRepository {
    fn with_pro(ids: &[&str]) -> Self {
        Self {
            subs: ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        Subscription {
                            user_id: id.to_string(),
                            plan: SubscriptionPlan::Pro,
                            status: SubscriptionStatus::Active,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl SubscriptionRepositoryTrait for MockSubscriptionRepository {
    fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        Ok(self.subs.get(user_id).cloned())
    }
}

struct MockPriceProvider {
    prices: HashMap<String, Decimal>,
    calls: Mutex<Vec<String>>,
}

impl MockPriceProvider {
    fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: prices.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_usd_quote(&self, coin_id: &str) -> std::result::Result<CoinQuote, MarketDataError> {
        self.calls.lock().unwrap().push(coin_id.to_string());
        self.prices
            .get(coin_id)
            .map(|p| CoinQuote::new(coin_id, *p, "MOCK"))
            .ok_or_else(|| MarketDataError::provider("MOCK", "connection reset"))
    }
}

#[derive(Default)]
struct MockEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail_for: Vec<String>,
}

#[async_trait]
impl EmailSender for MockEmailSender {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.fail_for.iter().any(|to| to == &message.to) {
            return Err(Error::Email(format!("rejected {}", message.to)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn pref(user_id: &str, frequency: DigestFrequency, last_sent_at: Option<NaiveDateTime>) -> DigestPreference {
    DigestPreference {
        user_id: user_id.to_string(),
        digest_enabled: true,
        digest_frequency: frequency,
        last_sent_at,
    }
}

struct Harness {
    prefs: Arc<MockPreferenceRepository>,
    sender: Arc<MockEmailSender>,
    provider: Arc<MockPriceProvider>,
    service: DigestService,
}

fn harness(
    prefs: MockPreferenceRepository,
    users: MockUserRepository,
    holdings: MockHoldingRepository,
    subs: MockSubscriptionRepository,
    provider: MockPriceProvider,
    sender: MockEmailSender,
    config: DigestConfig,
) -> Harness {
    let prefs = Arc::new(prefs);
    let sender = Arc::new(sender);
    let provider = Arc::new(provider);
    let price_service = Arc::new(PriceService::new(
        provider.clone(),
        Arc::new(NoopPriceCache),
        std::time::Duration::from_secs(60),
    ));
    let service = DigestService::new(
        prefs.clone(),
        Arc::new(users),
        Arc::new(holdings),
        Arc::new(SubscriptionService::new(Arc::new(subs))),
        price_service,
        sender.clone(),
        config,
    );
    Harness {
        prefs,
        sender,
        provider,
        service,
    }
}

// ---------- tests ----------

#[tokio::test]
async fn test_single_holding_digest_values() {
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Weekly, None)]),
        MockUserRepository::with_users(&["alice"]),
        MockHoldingRepository::default().add("alice", "bitcoin", dec!(2), dec!(100)),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[("bitcoin", dec!(150))]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let summary = h.service.send_digests(monday()).await.unwrap();

    assert_eq!(summary, DigestRunSummary { sent: 1, errors: 0, total: 1 });
    let sent = h.sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert!(sent[0].html.contains("$300.00"));
    assert!(sent[0].html.contains("+50.00%"));
    assert!(sent[0].html.contains("$100.00"));
    assert!(sent[0].html.contains("Upgrade to Pro"));
    assert_eq!(h.prefs.last_sent("alice"), Some(monday().naive_utc()));
}

#[tokio::test]
async fn test_pro_user_gets_summary_insight() {
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Daily, None)]),
        MockUserRepository::with_users(&["alice"]),
        MockHoldingRepository::default().add("alice", "bitcoin", dec!(2), dec!(100)),
        MockSubscriptionRepository::with_pro(&["alice"]),
        MockPriceProvider::new(&[("bitcoin", dec!(150))]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    h.service.send_digests(monday()).await.unwrap();
    let sent = h.sender.sent.lock().unwrap();
    assert!(sent[0].html.contains("AI insights"));
    assert!(!sent[0].html.contains("Upgrade to Pro"));
    assert!(sent[0].subject.starts_with("Your daily portfolio digest"));
}

#[tokio::test]
async fn test_insights_disabled_omits_block() {
    let config = DigestConfig {
        insights_enabled: false,
        ..DigestConfig::default()
    };
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Weekly, None)]),
        MockUserRepository::with_users(&["alice"]),
        MockHoldingRepository::default().add("alice", "bitcoin", dec!(1), dec!(100)),
        MockSubscriptionRepository::with_pro(&["alice"]),
        MockPriceProvider::new(&[("bitcoin", dec!(150))]),
        MockEmailSender::default(),
        config,
    );

    h.service.send_digests(monday()).await.unwrap();
    let sent = h.sender.sent.lock().unwrap();
    assert!(!sent[0].html.contains("AI insights"));
    assert!(!sent[0].html.contains("Upgrade to Pro"));
}

#[tokio::test]
async fn test_price_failure_defaults_to_zero_and_prices_are_deduplicated() {
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Weekly, None)]),
        MockUserRepository::with_users(&["alice"]),
        MockHoldingRepository::default()
            .add("alice", "bitcoin", dec!(1), dec!(100))
            .add("alice", "bitcoin", dec!(1), dec!(120))
            .add("alice", "dogecoin", dec!(1000), dec!(0.1)),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[("bitcoin", dec!(150))]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let summary = h.service.send_digests(monday()).await.unwrap();

    assert_eq!(summary, DigestRunSummary { sent: 1, errors: 0, total: 1 });
    let calls = h.provider.calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["bitcoin".to_string(), "dogecoin".to_string()]);
    // 2 BTC at 150, DOGE at 0
    assert!(h.sender.sent.lock().unwrap()[0].html.contains("$300.00"));
}

#[tokio::test]
async fn test_send_failure_counts_error_and_continues() {
    let sender = MockEmailSender {
        fail_for: vec!["alice@example.com".to_string()],
        ..MockEmailSender::default()
    };
    let h = harness(
        MockPreferenceRepository::with(vec![
            pref("alice", DigestFrequency::Weekly, None),
            pref("bob", DigestFrequency::Weekly, None),
        ]),
        MockUserRepository::with_users(&["alice", "bob"]),
        MockHoldingRepository::default()
            .add("alice", "bitcoin", dec!(1), dec!(100))
            .add("bob", "ethereum", dec!(1), dec!(100)),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[("bitcoin", dec!(150)), ("ethereum", dec!(90))]),
        sender,
        DigestConfig::default(),
    );

    let summary = h.service.send_digests(monday()).await.unwrap();

    assert_eq!(summary, DigestRunSummary { sent: 1, errors: 1, total: 2 });
    assert_eq!(h.prefs.last_sent("alice"), None);
    assert_eq!(h.prefs.last_sent("bob"), Some(monday().naive_utc()));
}

#[tokio::test]
async fn test_oversized_stored_holding_does_not_abort_run() {
    let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
    let h = harness(
        MockPreferenceRepository::with(vec![
            pref("alice", DigestFrequency::Weekly, None),
            pref("bob", DigestFrequency::Weekly, None),
        ]),
        MockUserRepository::with_users(&["alice", "bob"]),
        MockHoldingRepository::default()
            .add("alice", "bitcoin", huge, dec!(1))
            .add("bob", "ethereum", dec!(1), dec!(100)),
        MockSubscriptionRepository::with_pro(&["alice"]),
        MockPriceProvider::new(&[("bitcoin", dec!(10000000000)), ("ethereum", dec!(90))]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let summary = h.service.send_digests(monday()).await.unwrap();

    assert_eq!(summary, DigestRunSummary { sent: 2, errors: 0, total: 2 });
    assert_eq!(h.prefs.last_sent("bob"), Some(monday().naive_utc()));
}

#[tokio::test]
async fn test_missing_user_and_empty_holdings_are_silent_skips() {
    let h = harness(
        MockPreferenceRepository::with(vec![
            pref("ghost", DigestFrequency::Weekly, None),
            pref("empty", DigestFrequency::Weekly, None),
        ]),
        MockUserRepository::with_users(&["empty"]),
        MockHoldingRepository::default(),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let summary = h.service.send_digests(monday()).await.unwrap();

    assert_eq!(summary, DigestRunSummary { sent: 0, errors: 0, total: 2 });
    assert!(h.sender.sent.lock().unwrap().is_empty());
    assert_eq!(h.prefs.last_sent("empty"), None);
}

#[tokio::test]
async fn test_ineligible_users_are_not_counted() {
    let now = monday();
    let mut disabled = pref("disabled", DigestFrequency::Weekly, None);
    disabled.digest_enabled = false;
    let h = harness(
        MockPreferenceRepository::with(vec![
            disabled,
            pref("cooling", DigestFrequency::Weekly, Some((now - Duration::hours(3)).naive_utc())),
            pref(
                "free-daily",
                DigestFrequency::Daily,
                Some((now - Duration::days(2)).naive_utc()),
            ),
            pref("weekly", DigestFrequency::Weekly, None),
        ]),
        MockUserRepository::with_users(&["disabled", "cooling", "free-daily", "weekly"]),
        MockHoldingRepository::default()
            .add("disabled", "bitcoin", dec!(1), dec!(1))
            .add("cooling", "bitcoin", dec!(1), dec!(1))
            .add("free-daily", "bitcoin", dec!(1), dec!(1))
            .add("weekly", "bitcoin", dec!(1), dec!(1)),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[("bitcoin", dec!(2))]),
        MockEmailSender::default(),
        DigestConfig {
            weekly_day: Weekday::Fri,
            ..DigestConfig::default()
        },
    );

    let summary = h.service.send_digests(now).await.unwrap();

    assert_eq!(summary, DigestRunSummary::default());
    assert!(h.sender.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_run_is_blocked_by_cooldown() {
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Daily, None)]),
        MockUserRepository::with_users(&["alice"]),
        MockHoldingRepository::default().add("alice", "bitcoin", dec!(1), dec!(100)),
        MockSubscriptionRepository::with_pro(&["alice"]),
        MockPriceProvider::new(&[("bitcoin", dec!(150))]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let first = h.service.send_digests(monday()).await.unwrap();
    let second = h
        .service
        .send_digests(monday() + Duration::hours(1))
        .await
        .unwrap();
    let next_day = h
        .service
        .send_digests(monday() + Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(first.sent, 1);
    assert_eq!(second, DigestRunSummary::default());
    assert_eq!(next_day.sent, 1);
}

#[tokio::test]
async fn test_update_preference_keeps_last_sent() {
    let sent_at = monday().naive_utc();
    let h = harness(
        MockPreferenceRepository::with(vec![pref("alice", DigestFrequency::Weekly, Some(sent_at))]),
        MockUserRepository::default(),
        MockHoldingRepository::default(),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let updated = h
        .service
        .update_preference(
            "alice",
            DigestPreferenceUpdate {
                digest_enabled: None,
                digest_frequency: Some(DigestFrequency::Daily),
            },
        )
        .await
        .unwrap();

    assert!(updated.digest_enabled);
    assert_eq!(updated.digest_frequency, DigestFrequency::Daily);
    assert_eq!(updated.last_sent_at, Some(sent_at));
}

#[tokio::test]
async fn test_get_preference_defaults_for_unknown_user() {
    let h = harness(
        MockPreferenceRepository::default(),
        MockUserRepository::default(),
        MockHoldingRepository::default(),
        MockSubscriptionRepository::default(),
        MockPriceProvider::new(&[]),
        MockEmailSender::default(),
        DigestConfig::default(),
    );

    let pref = h.service.get_preference("new-user").unwrap();
    assert_eq!(pref, DigestPreference::default_for("new-user"));
}
