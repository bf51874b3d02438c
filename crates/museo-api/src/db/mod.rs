//! # Database Persistence Layer
//!
//! Provides Postgres persistence for the catalog via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, the API
//! persists expositions, exhibits, and user profiles to PostgreSQL. When
//! absent, the API operates in in-memory-only mode (suitable for development
//! and testing).
//!
//! Writes go through the in-memory stores first and are then mirrored here
//! (write-through); on startup the stores are hydrated from these tables.
//! The one multi-statement operation — deleting an exposition while
//! re-parenting its exhibits to the default storage exposition — runs as a
//! single transaction in [`expositions::delete_and_reparent`].

pub mod exhibits;
pub mod expositions;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
