//! Display formatting for money and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// `$1,234.56`, `-$12.00`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = round_display(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// `+12.34%`, `-5.00%`, `0.00%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = round_display(value);
    if rounded.is_zero() {
        return "0.00%".to_string();
    }
    let sign = if rounded.is_sign_negative() { "-" } else { "+" };
    format!("{}{:.2}%", sign, rounded.abs())
}
