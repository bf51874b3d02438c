//! # museo-api — Axum API Service for the Museum Catalog
//!
//! HTTP surface over the museum catalog: floor listings, expositions,
//! exhibits, user profiles and informational pages, with role-gated
//! curation.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                  | Domain               |
//! |-------------------------|-------------------------|----------------------|
//! | `/v1/floors/*`          | [`routes::floors`]      | Floor listings       |
//! | `/v1/expositions/*`     | [`routes::expositions`] | Expositions          |
//! | `/v1/exhibits/*`        | [`routes::exhibits`]    | Exhibits             |
//! | `/v1/profile`, `/v1/profiles/*` | [`routes::profile`] | User profiles   |
//! | `/v1/pages/*`           | [`routes::pages`]       | Informational pages  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Maximum accepted request body size.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and the OpenAPI spec are mounted outside the
/// auth middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::floors::router())
        .merge(routes::expositions::router())
        .merge(routes::exhibits::router())
        .merge(routes::profile::router())
        .merge(routes::pages::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated surface: health probes and the spec.
    let open = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .merge(openapi::router())
        .with_state(state);

    Router::new().merge(open).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application can serve requests.
///
/// When a database pool is configured, a round trip is required so that a
/// wedged pool takes the instance out of rotation.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    if let Some(pool) = &state.db_pool {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "readiness probe failed: database unreachable");
                StatusCode::SERVICE_UNAVAILABLE
            })?;
    }
    Ok("ready")
}
