use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use coinfolio_core::digest::{DigestFrequency, DigestPreference, DigestPreferenceRepositoryTrait};
use coinfolio_core::{Error, Result};

use super::model::DigestPreferenceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::digest_preferences;

pub struct DigestPreferenceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DigestPreferenceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DigestPreferenceRepository { pool, writer }
    }
}

fn to_domain(rows: Vec<DigestPreferenceDB>) -> Result<Vec<DigestPreference>> {
    rows.into_iter()
        .map(|row| DigestPreference::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl DigestPreferenceRepositoryTrait for DigestPreferenceRepository {
    fn list_enabled(&self) -> Result<Vec<DigestPreference>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = digest_preferences::table
            .filter(digest_preferences::digest_enabled.eq(true))
            .order(digest_preferences::user_id.asc())
            .select(DigestPreferenceDB::as_select())
            .load::<DigestPreferenceDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn get_preference(&self, user_id: &str) -> Result<Option<DigestPreference>> {
        let mut conn = get_connection(&self.pool)?;
        let row = digest_preferences::table
            .find(user_id)
            .select(DigestPreferenceDB::as_select())
            .first::<DigestPreferenceDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(DigestPreference::try_from)
            .transpose()
            .map_err(Into::into)
    }

    async fn upsert_preference(
        &self,
        user_id: &str,
        digest_enabled: bool,
        digest_frequency: DigestFrequency,
    ) -> Result<DigestPreference> {
        let row = DigestPreferenceDB {
            user_id: user_id.to_string(),
            digest_enabled,
            digest_frequency: digest_frequency.as_str().to_string(),
            last_sent_at: None,
            updated_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DigestPreference> {
                diesel::insert_into(digest_preferences::table)
                    .values(&row)
                    .on_conflict(digest_preferences::user_id)
                    .do_update()
                    .set((
                        digest_preferences::digest_enabled.eq(row.digest_enabled),
                        digest_preferences::digest_frequency.eq(&row.digest_frequency),
                        digest_preferences::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = digest_preferences::table
                    .find(&row.user_id)
                    .select(DigestPreferenceDB::as_select())
                    .first::<DigestPreferenceDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(DigestPreference::try_from(stored)?)
            })
            .await
    }

    async fn mark_sent(&self, user_id: &str, sent_at: NaiveDateTime) -> Result<()> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(digest_preferences::table.find(&user_id))
                    .set((
                        digest_preferences::last_sent_at.eq(Some(sent_at)),
                        digest_preferences::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::NotFound(format!(
                        "Digest preference for user {}",
                        user_id
                    )));
                }
                Ok(())
            })
            .await
    }
}
