use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use coinfolio_core::users::{UserProfile, UserRepositoryTrait};
use coinfolio_core::Result;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(UserProfile::from))
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<UserProfile> {
        let row = UserDB::from(profile);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserProfile> {
                diesel::insert_into(users::table)
                    .values(&row)
                    .on_conflict(users::id)
                    .do_update()
                    .set((
                        users::email.eq(&row.email),
                        users::display_name.eq(&row.display_name),
                        users::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = users::table
                    .find(&row.id)
                    .select(UserDB::as_select())
                    .first::<UserDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(stored.into())
            })
            .await
    }
}
