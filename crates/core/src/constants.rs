use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for analytics results
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Crypto markets trade every day of the year.
pub const TRADING_DAYS_PER_YEAR: u32 = 365;

/// Minimum time between two digests for the same user.
pub const DIGEST_COOLDOWN_HOURS: i64 = 20;

/// Number of movers listed in a digest.
pub const DIGEST_TOP_MOVERS: usize = 3;

/// Largest quantity accepted for a single holding.
pub const MAX_HOLDING_QUANTITY: Decimal = dec!(1000000000000000);

/// Largest purchase price accepted for a single holding, in USD.
pub const MAX_PURCHASE_PRICE: Decimal = dec!(1000000000000);
