use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use coinfolio_core::portfolio::holdings::{Holding, HoldingRepositoryTrait, NewHolding};
use coinfolio_core::Result;

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::user_portfolios;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HoldingRepository { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_portfolios::table
            .filter(user_portfolios::user_id.eq(user_id))
            .order((
                user_portfolios::purchase_date.asc(),
                user_portfolios::created_at.asc(),
            ))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| Holding::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn insert_holding(&self, user_id: &str, new_holding: NewHolding) -> Result<Holding> {
        let holding = Holding {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            coin_id: new_holding.coin_id,
            coin_name: new_holding.coin_name,
            coin_symbol: new_holding.coin_symbol,
            quantity: new_holding.quantity,
            purchase_price: new_holding.purchase_price,
            purchase_date: new_holding.purchase_date,
            created_at: Utc::now().naive_utc(),
        };
        let row = HoldingDB::from(&holding);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                diesel::insert_into(user_portfolios::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(holding)
            })
            .await
    }

    async fn delete_holding(&self, user_id: &str, holding_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let holding_id = holding_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(
                    user_portfolios::table
                        .filter(user_portfolios::id.eq(&holding_id))
                        .filter(user_portfolios::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }
}
