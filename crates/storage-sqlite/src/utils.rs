//! Column conversion helpers.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a decimal stored as text.
pub fn parse_decimal(column: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value.trim()).map_err(|e| {
        StorageError::InvalidData(format!("{} has invalid decimal '{}': {}", column, value, e))
    })
}

/// Parses an enum stored as text through its `FromStr`.
pub fn parse_enum<T>(column: &str, value: &str) -> Result<T, StorageError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| StorageError::InvalidData(format!("{}: {}", column, e)))
}
