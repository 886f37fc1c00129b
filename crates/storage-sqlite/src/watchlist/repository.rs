use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use coinfolio_core::watchlist::{NewWatchlistItem, WatchlistItem, WatchlistRepositoryTrait};
use coinfolio_core::Result;

use super::model::WatchlistItemDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::watchlist;

pub struct WatchlistRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WatchlistRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        WatchlistRepository { pool, writer }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    fn list_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = watchlist::table
            .filter(watchlist::user_id.eq(user_id))
            .order((watchlist::created_at.asc(), watchlist::coin_id.asc()))
            .select(WatchlistItemDB::as_select())
            .load::<WatchlistItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(WatchlistItem::from).collect())
    }

    async fn add_watchlist_item(
        &self,
        user_id: &str,
        item: NewWatchlistItem,
    ) -> Result<WatchlistItem> {
        let row = WatchlistItemDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            coin_id: item.coin_id,
            coin_name: item.coin_name,
            coin_symbol: item.coin_symbol,
            created_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WatchlistItem> {
                let existing = watchlist::table
                    .filter(watchlist::user_id.eq(&row.user_id))
                    .filter(watchlist::coin_id.eq(&row.coin_id))
                    .select(WatchlistItemDB::as_select())
                    .first::<WatchlistItemDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if let Some(existing) = existing {
                    return Ok(existing.into());
                }

                diesel::insert_into(watchlist::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn remove_watchlist_item(&self, user_id: &str, coin_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let coin_id = coin_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed = diesel::delete(
                    watchlist::table
                        .filter(watchlist::user_id.eq(&user_id))
                        .filter(watchlist::coin_id.eq(&coin_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }
}
