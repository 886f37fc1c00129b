//! Database models for user profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use coinfolio_core::users::UserProfile;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for UserProfile {
    fn from(db: UserDB) -> Self {
        UserProfile {
            id: db.id,
            email: db.email,
            display_name: db.display_name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<UserProfile> for UserDB {
    fn from(profile: UserProfile) -> Self {
        UserDB {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
