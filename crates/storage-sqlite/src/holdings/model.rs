//! Database models for holdings.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use coinfolio_core::portfolio::holdings::Holding;

use crate::errors::StorageError;
use crate::utils::parse_decimal;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub user_id: String,
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub quantity: String,
    pub purchase_price: String,
    pub purchase_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl TryFrom<HoldingDB> for Holding {
    type Error = StorageError;

    fn try_from(db: HoldingDB) -> Result<Self, Self::Error> {
        Ok(Holding {
            quantity: parse_decimal("quantity", &db.quantity)?,
            purchase_price: parse_decimal("purchase_price", &db.purchase_price)?,
            id: db.id,
            user_id: db.user_id,
            coin_id: db.coin_id,
            coin_name: db.coin_name,
            coin_symbol: db.coin_symbol,
            purchase_date: db.purchase_date,
            created_at: db.created_at,
        })
    }
}

impl From<&Holding> for HoldingDB {
    fn from(h: &Holding) -> Self {
        HoldingDB {
            id: h.id.clone(),
            user_id: h.user_id.clone(),
            coin_id: h.coin_id.clone(),
            coin_name: h.coin_name.clone(),
            coin_symbol: h.coin_symbol.clone(),
            quantity: h.quantity.to_string(),
            purchase_price: h.purchase_price.to_string(),
            purchase_date: h.purchase_date,
            created_at: h.created_at,
        }
    }
}
