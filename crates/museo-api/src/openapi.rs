//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec, served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Museo Catalog API",
        version = "0.1.0",
        description = "Museum catalog service: floor listings, expositions, \
                       exhibits, user profiles and informational pages, with \
                       role-gated curation.",
        license(name = "MIT")
    ),
    paths(
        // Floors
        crate::routes::floors::list_floor,
        // Expositions
        crate::routes::expositions::create_exposition,
        crate::routes::expositions::list_exposition,
        crate::routes::expositions::update_exposition,
        crate::routes::expositions::delete_exposition,
        // Exhibits
        crate::routes::exhibits::create_exhibit,
        crate::routes::exhibits::get_exhibit,
        crate::routes::exhibits::update_exhibit,
        crate::routes::exhibits::delete_exhibit,
        // Profiles
        crate::routes::profile::update_profile,
        crate::routes::profile::get_profile,
        // Pages
        crate::routes::pages::get_page,
    ),
    components(schemas(
        // State record types
        crate::state::ExpositionRecord,
        crate::state::ExhibitRecord,
        crate::state::UserRecord,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Floor DTOs
        crate::routes::floors::FloorExposition,
        crate::routes::floors::FloorListing,
        // Exposition DTOs
        crate::routes::expositions::ExpositionFields,
        crate::routes::expositions::ExpositionSaved,
        crate::routes::expositions::ExpositionListing,
        crate::routes::expositions::ExpositionDeleted,
        // Exhibit DTOs
        crate::routes::exhibits::ExhibitFields,
        crate::routes::exhibits::ExhibitSaved,
        crate::routes::exhibits::ExhibitDeleted,
        // Profile DTOs
        crate::routes::profile::ProfileFields,
        crate::routes::profile::ProfileView,
        crate::routes::profile::ProfileSaved,
        // Page DTOs
        crate::routes::pages::PageView,
    )),
    tags(
        (name = "floors", description = "Floor listings"),
        (name = "expositions", description = "Exposition listing and curation"),
        (name = "exhibits", description = "Exhibit detail and curation"),
        (name = "profile", description = "User profiles"),
        (name = "pages", description = "Informational pages"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
