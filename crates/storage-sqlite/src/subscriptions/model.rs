//! Database models for subscriptions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use coinfolio_core::subscriptions::Subscription;

use crate::errors::StorageError;
use crate::utils::parse_enum;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionDB {
    pub user_id: String,
    pub plan: String,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SubscriptionDB> for Subscription {
    type Error = StorageError;

    fn try_from(db: SubscriptionDB) -> Result<Self, Self::Error> {
        Ok(Subscription {
            plan: parse_enum("plan", &db.plan)?,
            status: parse_enum("status", &db.status)?,
            user_id: db.user_id,
        })
    }
}
