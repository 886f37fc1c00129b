//! Portfolio risk metrics.
//!
//! Pure functions over decimal series. Every function is total: empty,
//! single-element and degenerate inputs return zero instead of failing, and
//! divisions are guarded.
//!
//! The return series fed into these functions is synthetic (see
//! [`generate_daily_returns`]); the results are illustrative, not statistics
//! over real price history.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{DECIMAL_PRECISION, TRADING_DAYS_PER_YEAR};
use crate::portfolio::holdings::PricedHolding;

/// sqrt(365), used if the square root ever fails.
const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(19.104973174542800);

/// Annual risk-free rate used by the Sharpe ratio.
const RISK_FREE_RATE: Decimal = Decimal::ZERO;

const VOLATILITY_WEIGHT: Decimal = dec!(0.6);
const DRAWDOWN_WEIGHT: Decimal = dec!(0.4);

fn annualization_factor() -> Decimal {
    checked_sqrt(Decimal::from(TRADING_DAYS_PER_YEAR)).unwrap_or(SQRT_TRADING_DAYS_APPROX)
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Square root from an `f64` estimate refined by two Newton steps.
/// Bounded work for any input; `None` for negative values.
fn checked_sqrt(value: Decimal) -> Option<Decimal> {
    if value.is_sign_negative() {
        return None;
    }
    let mut root = Decimal::from_f64(value.to_f64()?.sqrt())?;
    for _ in 0..2 {
        if root.is_zero() {
            break;
        }
        root = root
            .checked_add(value.checked_div(root)?)?
            .checked_div(Decimal::TWO)?;
    }
    Some(root)
}

/// Arithmetic mean; zero for empty input or on overflow.
fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    checked_sum(values.iter().copied())
        .and_then(|sum| sum.checked_div(Decimal::from(values.len())))
        .unwrap_or(Decimal::ZERO)
}

/// Sample standard deviation; zero for fewer than two points or on overflow.
fn sample_std_dev(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let avg = mean(values);
    let squared_diffs: Option<Vec<Decimal>> = values
        .iter()
        .map(|&v| {
            let diff = v.checked_sub(avg)?;
            diff.checked_mul(diff)
        })
        .collect();
    let variance = squared_diffs
        .and_then(checked_sum)
        .and_then(|sum| sum.checked_div(Decimal::from(values.len() - 1)))
        .unwrap_or(Decimal::ZERO);
    if variance.is_sign_negative() || variance.is_zero() {
        return Decimal::ZERO;
    }
    checked_sqrt(variance).unwrap_or(Decimal::ZERO)
}

/// Builds a proxy daily-return series from static holding data.
///
/// Each holding's purchase-to-current fractional return is spread evenly
/// over the days it has been held (at least one). Holdings bought at a zero
/// price carry no return and are skipped. The series is ordered by purchase
/// date, then coin id.
pub fn generate_daily_returns(holdings: &[PricedHolding], as_of: NaiveDate) -> Vec<Decimal> {
    let mut ordered: Vec<&PricedHolding> = holdings
        .iter()
        .filter(|h| !h.holding.purchase_price.is_zero())
        .collect();
    ordered.sort_by(|a, b| {
        a.holding
            .purchase_date
            .cmp(&b.holding.purchase_date)
            .then_with(|| a.holding.coin_id.cmp(&b.holding.coin_id))
    });

    ordered
        .into_iter()
        .filter_map(|h| {
            let days_held = (as_of - h.holding.purchase_date).num_days().max(1);
            let total_return = h
                .current_price
                .checked_sub(h.holding.purchase_price)?
                .checked_div(h.holding.purchase_price)?;
            total_return.checked_div(Decimal::from(days_held))
        })
        .collect()
}

/// Annualized Sharpe ratio of a daily return series.
///
/// Returns zero for fewer than two points or a flat series.
pub fn calculate_sharpe_ratio(returns: &[Decimal]) -> Decimal {
    let std_dev = sample_std_dev(returns);
    if std_dev.is_zero() {
        return Decimal::ZERO;
    }
    let daily_risk_free = RISK_FREE_RATE / Decimal::from(TRADING_DAYS_PER_YEAR);

    mean(returns)
        .checked_sub(daily_risk_free)
        .and_then(|excess| excess.checked_div(std_dev))
        .and_then(|ratio| ratio.checked_mul(annualization_factor()))
        .map(|sharpe| sharpe.round_dp(DECIMAL_PRECISION))
        .unwrap_or(Decimal::ZERO)
}

/// Annualized volatility of a daily return series, in percent.
pub fn calculate_volatility(returns: &[Decimal]) -> Decimal {
    let std_dev = sample_std_dev(returns);
    std_dev
        .checked_mul(annualization_factor())
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
        .map(|v| v.round_dp(DECIMAL_PRECISION))
        .unwrap_or(Decimal::ZERO)
}

/// Largest peak-to-trough decline of an ordered value series, in percent.
///
/// Zero for empty or non-decreasing input. Non-positive peaks are ignored.
pub fn calculate_max_drawdown(values: &[Decimal]) -> Decimal {
    let mut peak: Option<Decimal> = None;
    let mut max_drawdown = Decimal::ZERO;

    for &value in values {
        let current_peak = match peak {
            Some(p) if p >= value => p,
            _ => {
                peak = Some(value);
                value
            }
        };
        if current_peak <= Decimal::ZERO {
            continue;
        }
        if let Some(drawdown) = current_peak
            .checked_sub(value)
            .and_then(|d| d.checked_div(current_peak))
            .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
        {
            max_drawdown = max_drawdown.max(drawdown);
        }
    }

    max_drawdown.round_dp(DECIMAL_PRECISION)
}

/// Cumulative value path for a return series, starting at `base`.
pub fn value_series_from_returns(returns: &[Decimal], base: Decimal) -> Vec<Decimal> {
    let mut values = Vec::with_capacity(returns.len() + 1);
    let mut current = base;
    values.push(current);
    for &r in returns {
        let factor = Decimal::ONE.saturating_add(r).max(Decimal::ZERO);
        current = current.checked_mul(factor).unwrap_or(Decimal::MAX);
        values.push(current);
    }
    values
}

/// Inverted Herfindahl index of value weights, scaled to 0-100.
///
/// One holding scores 0; `n` equally weighted holdings score
/// `100 * (1 - 1/n)`. Holdings without positive value are ignored.
pub fn calculate_diversification_score(holdings: &[PricedHolding]) -> Decimal {
    let values: Vec<Decimal> = holdings
        .iter()
        .map(|h| h.current_value)
        .filter(|v| *v > Decimal::ZERO)
        .collect();
    let total = match checked_sum(values.iter().copied()) {
        Some(total) if !total.is_zero() => total,
        _ => return Decimal::ZERO,
    };

    let hhi: Decimal = values
        .iter()
        .filter_map(|v| v.checked_div(total))
        .map(|w| w * w)
        .sum();

    ((Decimal::ONE - hhi) * Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp(DECIMAL_PRECISION)
}

/// Weighted combination of volatility and drawdown (both percentages) on a 0-100 scale.
pub fn calculate_risk_score(volatility: Decimal, max_drawdown: Decimal) -> Decimal {
    let vol = volatility.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let drawdown = max_drawdown.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    (vol * VOLATILITY_WEIGHT + drawdown * DRAWDOWN_WEIGHT)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp(DECIMAL_PRECISION)
}
