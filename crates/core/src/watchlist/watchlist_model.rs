use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: String,
    pub user_id: String,
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistItem {
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
}

impl NewWatchlistItem {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("coinId", &self.coin_id),
            ("coinName", &self.coin_name),
            ("coinSymbol", &self.coin_symbol),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        Ok(())
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            coin_id: self.coin_id.trim().to_lowercase(),
            coin_name: self.coin_name.trim().to_string(),
            coin_symbol: self.coin_symbol.trim().to_uppercase(),
        }
    }
}

/// Watchlist entry with its latest quote. Price fields are `None` when the
/// fetch failed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistQuote {
    #[serde(flatten)]
    pub item: WatchlistItem,
    pub price: Option<Decimal>,
    pub change_24h: Option<Decimal>,
}
