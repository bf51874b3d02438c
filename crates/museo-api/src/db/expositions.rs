//! Exposition persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `expositions` table.

use chrono::{DateTime, Utc};
use museo_core::FloorPosition;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::ExpositionRecord;

/// Insert a new exposition record.
pub async fn insert(pool: &PgPool, record: &ExpositionRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO expositions (id, title, description, position, on_restoration, open,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.position.level())
    .bind(record.on_restoration)
    .bind(record.open)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update an existing exposition record. Returns whether a row was touched.
pub async fn update(pool: &PgPool, record: &ExpositionRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE expositions SET title = $1, description = $2, position = $3,
         on_restoration = $4, open = $5, updated_at = $6 WHERE id = $7",
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.position.level())
    .bind(record.on_restoration)
    .bind(record.open)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an exposition, re-parenting its exhibits to the storage exposition.
///
/// Runs as a single transaction: the re-parenting UPDATE and the DELETE
/// either both land or neither does, so an exhibit can never be observed
/// pointing at a deleted exposition. Returns whether the exposition existed.
pub async fn delete_and_reparent(
    pool: &PgPool,
    id: Uuid,
    storage_id: Uuid,
    reparented_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE exhibits SET placement = $1, updated_at = $2 WHERE placement = $3")
        .bind(storage_id)
        .bind(reparented_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM expositions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Load all expositions from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ExpositionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExpositionRow>(
        "SELECT id, title, description, position, on_restoration, open, created_at, updated_at
         FROM expositions ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping exposition row with undefined position during load_all");
            }
        }
    }
    Ok(records)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ExpositionRow {
    id: Uuid,
    title: String,
    description: String,
    position: i16,
    on_restoration: bool,
    open: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpositionRow {
    fn into_record(self) -> Option<ExpositionRecord> {
        let position = match FloorPosition::from_level(self.position) {
            Some(p) => p,
            None => {
                tracing::warn!(
                    id = %self.id,
                    position = self.position,
                    "skipping exposition row with undefined position"
                );
                return None;
            }
        };
        Some(ExpositionRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            position,
            on_restoration: self.on_restoration,
            open: self.open,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
