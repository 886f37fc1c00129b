//! Database models for watchlist entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use coinfolio_core::watchlist::WatchlistItem;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::watchlist)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistItemDB {
    pub id: String,
    pub user_id: String,
    pub coin_id: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub created_at: NaiveDateTime,
}

impl From<WatchlistItemDB> for WatchlistItem {
    fn from(db: WatchlistItemDB) -> Self {
        WatchlistItem {
            id: db.id,
            user_id: db.user_id,
            coin_id: db.coin_id,
            coin_name: db.coin_name,
            coin_symbol: db.coin_symbol,
            created_at: db.created_at,
        }
    }
}
