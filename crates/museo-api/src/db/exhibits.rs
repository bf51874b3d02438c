//! Exhibit persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `exhibits` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::ExhibitRecord;

/// Insert a new exhibit record.
pub async fn insert(pool: &PgPool, record: &ExhibitRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO exhibits (id, title, description, image_url, placement, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.image_url)
    .bind(record.placement)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update an existing exhibit record. Returns whether a row was touched.
pub async fn update(pool: &PgPool, record: &ExhibitRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE exhibits SET title = $1, description = $2, image_url = $3, placement = $4,
         updated_at = $5 WHERE id = $6",
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.image_url)
    .bind(record.placement)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an exhibit. Returns whether a row was touched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exhibits WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all exhibits from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ExhibitRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExhibitRow>(
        "SELECT id, title, description, image_url, placement, created_at, updated_at
         FROM exhibits ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ExhibitRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ExhibitRow {
    id: Uuid,
    title: String,
    description: String,
    image_url: Option<String>,
    placement: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExhibitRow {
    fn into_record(self) -> ExhibitRecord {
        ExhibitRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            placement: self.placement,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
