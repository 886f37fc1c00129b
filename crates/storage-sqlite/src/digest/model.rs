//! Database models for digest preferences.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use coinfolio_core::digest::DigestPreference;

use crate::errors::StorageError;
use crate::utils::parse_enum;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::digest_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DigestPreferenceDB {
    pub user_id: String,
    pub digest_enabled: bool,
    pub digest_frequency: String,
    pub last_sent_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<DigestPreferenceDB> for DigestPreference {
    type Error = StorageError;

    fn try_from(db: DigestPreferenceDB) -> Result<Self, Self::Error> {
        Ok(DigestPreference {
            digest_frequency: parse_enum("digest_frequency", &db.digest_frequency)?,
            user_id: db.user_id,
            digest_enabled: db.digest_enabled,
            last_sent_at: db.last_sent_at,
        })
    }
}
