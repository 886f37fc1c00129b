use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use coinfolio_market_data::{CoinQuote, MarketDataError, NoopPriceCache, PriceProvider};

use super::*;
use crate::errors::{Error, Result};
use crate::prices::PriceService;

#[derive(Default)]
struct MockHoldingRepository {
    holdings: Mutex<Vec<Holding>>,
}

#[async_trait]
impl HoldingRepositoryTrait for MockHoldingRepository {
    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_holding(&self, user_id: &str, new_holding: NewHolding) -> Result<Holding> {
        let mut holdings = self.holdings.lock().unwrap();
        let holding = Holding {
            id: format!("h-{}", holdings.len() + 1),
            user_id: user_id.to_string(),
            coin_id: new_holding.coin_id,
            coin_name: new_holding.coin_name,
            coin_symbol: new_holding.coin_symbol,
            quantity: new_holding.quantity,
            purchase_price: new_holding.purchase_price,
            purchase_date: new_holding.purchase_date,
            created_at: Utc::now().naive_utc(),
        };
        holdings.push(holding.clone());
        Ok(holding)
    }

    async fn delete_holding(&self, user_id: &str, holding_id: &str) -> Result<usize> {
        let mut holdings = self.holdings.lock().unwrap();
        let before = holdings.len();
        holdings.retain(|h| !(h.user_id == user_id && h.id == holding_id));
        Ok(before - holdings.len())
    }
}

struct MockPriceProvider {
    prices: HashMap<String, Decimal>,
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_usd_quote(&self, coin_id: &str) -> std::result::Result<CoinQuote, MarketDataError> {
        self.prices
            .get(coin_id)
            .map(|p| CoinQuote::new(coin_id, *p, "MOCK"))
            .ok_or_else(|| MarketDataError::SymbolNotFound(coin_id.to_string()))
    }
}

fn service(prices: &[(&str, Decimal)]) -> HoldingsService {
    let provider = MockPriceProvider {
        prices: prices.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    };
    let price_service = PriceService::new(
        Arc::new(provider),
        Arc::new(NoopPriceCache),
        std::time::Duration::from_secs(60),
    );
    HoldingsService::new(
        Arc::new(MockHoldingRepository::default()),
        Arc::new(price_service),
    )
}

fn new_holding(coin_id: &str, quantity: Decimal, price: Decimal) -> NewHolding {
    NewHolding {
        coin_id: coin_id.to_string(),
        coin_name: " Bitcoin ".to_string(),
        coin_symbol: "btc".to_string(),
        quantity,
        purchase_price: price,
        purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

#[tokio::test]
async fn test_add_holding_normalizes_fields() {
    let service = service(&[]);
    let holding = service
        .add_holding("u1", new_holding(" BitCoin", dec!(1), dec!(100)))
        .await
        .unwrap();

    assert_eq!(holding.coin_id, "bitcoin");
    assert_eq!(holding.coin_symbol, "BTC");
    assert_eq!(holding.coin_name, "Bitcoin");
    assert_eq!(service.get_holdings("u1").unwrap().len(), 1);
    assert!(service.get_holdings("u2").unwrap().is_empty());
}

#[tokio::test]
async fn test_add_holding_rejects_future_date() {
    let service = service(&[]);
    let mut holding = new_holding("bitcoin", dec!(1), dec!(100));
    holding.purchase_date = Utc::now().date_naive() + Duration::days(2);

    let err = service.add_holding("u1", holding).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_remove_holding() {
    let service = service(&[]);
    let holding = service
        .add_holding("u1", new_holding("bitcoin", dec!(1), dec!(100)))
        .await
        .unwrap();

    // another user's id does not match
    assert!(service
        .remove_holding("u2", &holding.id)
        .await
        .unwrap_err()
        .is_not_found());

    service.remove_holding("u1", &holding.id).await.unwrap();
    assert!(service.get_holdings("u1").unwrap().is_empty());
    assert!(service
        .remove_holding("u1", &holding.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_portfolio_values_holdings_at_latest_price() {
    let service = service(&[("bitcoin", dec!(150))]);
    service
        .add_holding("u1", new_holding("bitcoin", dec!(2), dec!(100)))
        .await
        .unwrap();

    let portfolio = service.get_portfolio("u1").await.unwrap();

    assert_eq!(portfolio.holdings.len(), 1);
    let priced = &portfolio.holdings[0];
    assert_eq!(priced.current_value, dec!(300));
    assert_eq!(priced.profit_loss, dec!(100));
    assert_eq!(priced.profit_loss_percent, dec!(50));
    assert_eq!(portfolio.summary.total_value, dec!(300));
}

#[tokio::test]
async fn test_portfolio_tolerates_unpriced_coin() {
    let service = service(&[("bitcoin", dec!(150))]);
    service
        .add_holding("u1", new_holding("bitcoin", dec!(2), dec!(100)))
        .await
        .unwrap();
    service
        .add_holding("u1", new_holding("obscurecoin", dec!(10), dec!(1)))
        .await
        .unwrap();

    let portfolio = service.get_portfolio("u1").await.unwrap();

    assert_eq!(portfolio.summary.holdings_count, 2);
    assert_eq!(portfolio.summary.total_value, dec!(300));
    assert_eq!(portfolio.summary.total_cost, dec!(210));
}

#[tokio::test]
async fn test_add_holding_rejects_oversized_quantity() {
    let service = service(&[]);
    let holding = new_holding(
        "bitcoin",
        Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0),
        dec!(1),
    );

    let err = service.add_holding("u1", holding).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(service.get_holdings("u1").unwrap().is_empty());
}
