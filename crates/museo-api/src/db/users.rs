//! User profile persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `users` table. Account
//! creation belongs to the identity collaborator; this module only mirrors
//! profile edits and hydrates the in-memory store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::UserRecord;

/// Update a user's profile fields. Returns whether a row was touched.
pub async fn update_profile(pool: &PgPool, record: &UserRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET username = $1, first_name = $2, last_name = $3, email = $4,
         updated_at = $5 WHERE id = $6",
    )
    .bind(&record.username)
    .bind(&record.first_name)
    .bind(&record.last_name)
    .bind(&record.email)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all users from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, first_name, last_name, email, groups, created_at, updated_at
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(UserRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    groups: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> UserRecord {
        UserRecord {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            groups: self.groups,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
