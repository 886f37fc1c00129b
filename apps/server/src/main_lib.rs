use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use coinfolio_ai::DeepSeekInsightGenerator;
use coinfolio_core::{
    digest::{DigestService, DigestServiceTrait},
    insights::{InsightGenerator, InsightService, InsightServiceTrait, TemplatedInsightGenerator},
    notifications::EmailSender,
    portfolio::{
        analytics::{AnalyticsService, AnalyticsServiceTrait},
        holdings::{HoldingsService, HoldingsServiceTrait},
    },
    prices::PriceService,
    subscriptions::{SubscriptionService, SubscriptionServiceTrait},
    users::{UserService, UserServiceTrait},
    watchlist::{WatchlistService, WatchlistServiceTrait},
};
use coinfolio_email::{LogEmailSender, ResendEmailSender};
use coinfolio_market_data::{
    CoinGeckoProvider, InMemoryPriceCache, NoopPriceCache, PriceCache, PriceProvider,
};
use coinfolio_storage_sqlite::{
    db, DigestPreferenceRepository, HoldingRepository, SubscriptionRepository, UserRepository,
    WatchlistRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait>,
    pub insight_service: Arc<dyn InsightServiceTrait>,
    pub watchlist_service: Arc<dyn WatchlistServiceTrait>,
    pub digest_service: Arc<dyn DigestServiceTrait>,
    pub cron_secret: Option<String>,
    /// Held for the duration of a digest run.
    pub digest_lock: Mutex<()>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_email_sender(config: &Config) -> anyhow::Result<Arc<dyn EmailSender>> {
    match config.resend_api_key.as_deref() {
        Some(key) => Ok(Arc::new(ResendEmailSender::new(key)?)),
        None => {
            tracing::warn!("RESEND_API_KEY not set; digest emails will only be logged");
            Ok(Arc::new(LogEmailSender))
        }
    }
}

fn build_insight_generator(config: &Config) -> anyhow::Result<Arc<dyn InsightGenerator>> {
    match config.deepseek_api_key.as_deref() {
        Some(key) => Ok(Arc::new(DeepSeekInsightGenerator::with_base_url(
            &config.deepseek_base_url,
            key,
        )?)),
        None => Ok(Arc::new(TemplatedInsightGenerator)),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;

    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let subscription_repository =
        Arc::new(SubscriptionRepository::new(pool.clone(), writer.clone()));
    let digest_repository = Arc::new(DigestPreferenceRepository::new(
        pool.clone(),
        writer.clone(),
    ));
    let watchlist_repository = Arc::new(WatchlistRepository::new(pool.clone(), writer.clone()));

    let provider: Arc<dyn PriceProvider> = Arc::new(CoinGeckoProvider::with_base_url(
        &config.coingecko_base_url,
        config.coingecko_api_key.clone(),
    ));
    let cache: Arc<dyn PriceCache> = if config.price_cache_ttl.is_zero() {
        Arc::new(NoopPriceCache)
    } else {
        Arc::new(InMemoryPriceCache::new())
    };
    let price_service = Arc::new(PriceService::new(provider, cache, config.price_cache_ttl));

    let subscription_service: Arc<dyn SubscriptionServiceTrait> =
        Arc::new(SubscriptionService::new(subscription_repository));
    let user_service: Arc<dyn UserServiceTrait> =
        Arc::new(UserService::new(user_repository.clone()));
    let holdings_service: Arc<dyn HoldingsServiceTrait> = Arc::new(HoldingsService::new(
        holding_repository.clone(),
        price_service.clone(),
    ));
    let analytics_service: Arc<dyn AnalyticsServiceTrait> = Arc::new(AnalyticsService::new(
        holdings_service.clone(),
        subscription_service.clone(),
    ));

    let generator = build_insight_generator(config)?;
    tracing::info!("Insight generator: {}", generator.id());
    let insight_service: Arc<dyn InsightServiceTrait> = Arc::new(InsightService::new(
        generator,
        holdings_service.clone(),
        subscription_service.clone(),
    ));

    let watchlist_service: Arc<dyn WatchlistServiceTrait> = Arc::new(WatchlistService::new(
        watchlist_repository,
        price_service.clone(),
    ));

    let email_sender = build_email_sender(config)?;
    tracing::info!("Email sender: {}", email_sender.id());
    let digest_service: Arc<dyn DigestServiceTrait> = Arc::new(DigestService::new(
        digest_repository,
        user_repository,
        holding_repository,
        subscription_service,
        price_service,
        email_sender,
        config.digest.clone(),
    ));

    if config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET not set; the digest trigger will reject every request");
    }

    Ok(Arc::new(AppState {
        user_service,
        holdings_service,
        analytics_service,
        insight_service,
        watchlist_service,
        digest_service,
        cron_secret: config.cron_secret.clone(),
        digest_lock: Mutex::new(()),
    }))
}
