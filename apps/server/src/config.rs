use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use chrono::Weekday;
use coinfolio_ai::DEEPSEEK_BASE_URL;
use coinfolio_core::digest::DigestConfig;
use coinfolio_market_data::provider::coingecko::DEFAULT_BASE_URL as COINGECKO_BASE_URL;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Bearer token for the digest trigger. `None` rejects every call.
    pub cron_secret: Option<String>,
    pub resend_api_key: Option<String>,
    pub coingecko_api_key: Option<String>,
    pub coingecko_base_url: String,
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: String,
    pub digest: DigestConfig,
    pub digest_interval: Option<Duration>,
    /// Zero disables the price cache.
    pub price_cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/app.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            cron_secret: None,
            resend_api_key: None,
            coingecko_api_key: None,
            coingecko_base_url: COINGECKO_BASE_URL.to_string(),
            deepseek_api_key: None,
            deepseek_base_url: DEEPSEEK_BASE_URL.to_string(),
            digest: DigestConfig::default(),
            digest_interval: None,
            price_cache_ttl: Duration::from_secs(60),
        }
    }
}

/// Reads a variable, treating blank values as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_cors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match env_opt("CF_LISTEN_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("Invalid CF_LISTEN_ADDR: {}", addr))?,
            None => defaults.listen_addr,
        };
        let timeout_ms: u64 = env_opt("CF_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);

        let weekly_day = match env_opt("DIGEST_WEEKLY_DAY") {
            Some(day) => day
                .parse::<Weekday>()
                .map_err(|_| anyhow::anyhow!("Invalid DIGEST_WEEKLY_DAY: {}", day))?,
            None => defaults.digest.weekly_day,
        };
        let app_url = env_opt("APP_URL")
            .or_else(|| env_opt("NEXT_PUBLIC_APP_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.digest.app_url);
        let digest = DigestConfig {
            app_url,
            from_address: env_opt("DIGEST_FROM_ADDRESS").unwrap_or(defaults.digest.from_address),
            weekly_day,
            insights_enabled: env_opt("DIGEST_INSIGHTS_ENABLED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.digest.insights_enabled),
        };

        let digest_interval = match env_opt("CF_DIGEST_INTERVAL_HOURS") {
            Some(hours) => {
                let hours: u64 = hours
                    .parse()
                    .with_context(|| format!("Invalid CF_DIGEST_INTERVAL_HOURS: {}", hours))?;
                (hours > 0).then(|| Duration::from_secs(hours * 60 * 60))
            }
            None => None,
        };
        let price_cache_ttl = env_opt("PRICE_CACHE_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.price_cache_ttl);

        Ok(Self {
            listen_addr,
            db_path: env_opt("CF_DB_PATH").unwrap_or(defaults.db_path),
            cors_allow: env_opt("CF_CORS_ALLOW_ORIGINS")
                .map(|v| parse_cors(&v))
                .unwrap_or(defaults.cors_allow),
            request_timeout: Duration::from_millis(timeout_ms),
            cron_secret: env_opt("CRON_SECRET"),
            resend_api_key: env_opt("RESEND_API_KEY"),
            coingecko_api_key: env_opt("COINGECKO_API_KEY"),
            coingecko_base_url: env_opt("COINGECKO_BASE_URL")
                .unwrap_or(defaults.coingecko_base_url),
            deepseek_api_key: env_opt("DEEPSEEK_API_KEY"),
            deepseek_base_url: env_opt("DEEPSEEK_BASE_URL").unwrap_or(defaults.deepseek_base_url),
            digest,
            digest_interval,
            price_cache_ttl,
        })
    }
}
