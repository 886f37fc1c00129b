use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{DECIMAL_PRECISION, MAX_HOLDING_QUANTITY, MAX_PURCHASE_PRICE};
use crate::errors::{Result, ValidationError};

/// A user-recorded quantity of one coin bought at a given price and date.
///
/// Holdings are created on manual entry and deleted on manual removal; they
/// are never updated in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub user_id: String,
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Input model for adding a holding
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
}

impl NewHolding {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        for (field, value) in [
            ("coinId", &self.coin_id),
            ("coinName", &self.coin_name),
            ("coinSymbol", &self.coin_symbol),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Quantity must be greater than zero".to_string(),
            )
            .into());
        }
        if self.quantity > MAX_HOLDING_QUANTITY {
            return Err(ValidationError::InvalidInput(format!(
                "Quantity cannot exceed {}",
                MAX_HOLDING_QUANTITY
            ))
            .into());
        }
        if self.purchase_price.is_sign_negative() {
            return Err(ValidationError::InvalidInput(
                "Purchase price cannot be negative".to_string(),
            )
            .into());
        }
        if self.purchase_price > MAX_PURCHASE_PRICE {
            return Err(ValidationError::InvalidInput(format!(
                "Purchase price cannot exceed {}",
                MAX_PURCHASE_PRICE
            ))
            .into());
        }
        if self.purchase_date > today {
            return Err(ValidationError::InvalidInput(
                "Purchase date cannot be in the future".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Holding valued at the latest fetched price. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub cost_basis: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

impl PricedHolding {
    /// Values that overflow saturate at the `Decimal` bounds.
    pub fn new(holding: Holding, current_price: Decimal) -> Self {
        let current_value = holding.quantity.saturating_mul(current_price);
        let cost_basis = holding.quantity.saturating_mul(holding.purchase_price);
        let profit_loss = current_value.saturating_sub(cost_basis);
        let profit_loss_percent = percent_of(profit_loss, cost_basis);

        Self {
            holding,
            current_price,
            current_value,
            cost_basis,
            profit_loss,
            profit_loss_percent,
        }
    }
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(DECIMAL_PRECISION))
        .unwrap_or(Decimal::ZERO)
}

/// Sum that saturates at the `Decimal` bounds instead of overflowing.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Portfolio-level totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
    pub holdings_count: usize,
}

impl PortfolioSummary {
    pub fn from_priced(holdings: &[PricedHolding]) -> Self {
        let total_value = saturating_sum(holdings.iter().map(|h| h.current_value));
        let total_cost = saturating_sum(holdings.iter().map(|h| h.cost_basis));
        let total_profit_loss = total_value.saturating_sub(total_cost);

        Self {
            total_value,
            total_cost,
            total_profit_loss,
            total_profit_loss_percent: percent_of(total_profit_loss, total_cost),
            holdings_count: holdings.len(),
        }
    }
}

/// Priced holdings plus their totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub holdings: Vec<PricedHolding>,
    pub summary: PortfolioSummary,
}

impl PortfolioValuation {
    pub fn new(holdings: Vec<PricedHolding>) -> Self {
        let summary = PortfolioSummary::from_priced(&holdings);
        Self { holdings, summary }
    }
}

/// A holding ranked by how far it moved since purchase.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopMover {
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub current_value: Decimal,
    pub profit_loss_percent: Decimal,
}

/// Values holdings at the given prices. A coin without a price is valued at zero.
pub fn price_holdings(
    holdings: Vec<Holding>,
    prices: &HashMap<String, Decimal>,
) -> Vec<PricedHolding> {
    holdings
        .into_iter()
        .map(|holding| {
            let price = prices
                .get(&holding.coin_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            PricedHolding::new(holding, price)
        })
        .collect()
}

/// The `limit` holdings with the largest absolute P&L percentage, largest first.
/// Ties keep their input order.
pub fn top_movers(holdings: &[PricedHolding], limit: usize) -> Vec<TopMover> {
    let mut ranked: Vec<&PricedHolding> = holdings.iter().collect();
    ranked.sort_by(|a, b| {
        b.profit_loss_percent
            .abs()
            .cmp(&a.profit_loss_percent.abs())
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|h| TopMover {
            coin_id: h.holding.coin_id.clone(),
            coin_name: h.holding.coin_name.clone(),
            coin_symbol: h.holding.coin_symbol.clone(),
            current_value: h.current_value,
            profit_loss_percent: h.profit_loss_percent,
        })
        .collect()
}
