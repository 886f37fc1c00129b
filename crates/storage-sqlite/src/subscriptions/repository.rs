use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use coinfolio_core::subscriptions::{Subscription, SubscriptionRepositoryTrait};
use coinfolio_core::Result;

use super::model::SubscriptionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::subscriptions;

/// Subscriptions are written by the billing integration; the app only reads them.
pub struct SubscriptionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SubscriptionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SubscriptionRepository { pool, writer }
    }

    /// Entry point for billing sync jobs and fixtures.
    pub async fn upsert_subscription(&self, subscription: Subscription) -> Result<()> {
        let row = SubscriptionDB {
            user_id: subscription.user_id,
            plan: subscription.plan.as_str().to_string(),
            status: subscription.status.as_str().to_string(),
            updated_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(subscriptions::table)
                    .values(&row)
                    .on_conflict(subscriptions::user_id)
                    .do_update()
                    .set((
                        subscriptions::plan.eq(&row.plan),
                        subscriptions::status.eq(&row.status),
                        subscriptions::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

impl SubscriptionRepositoryTrait for SubscriptionRepository {
    fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        let mut conn = get_connection(&self.pool)?;
        let row = subscriptions::table
            .find(user_id)
            .select(SubscriptionDB::as_select())
            .first::<SubscriptionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(Subscription::try_from)
            .transpose()
            .map_err(Into::into)
    }
}
