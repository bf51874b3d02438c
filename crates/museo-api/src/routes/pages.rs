//! # Informational Pages
//!
//! Static pages (index, about, visitor rules) rendered as JSON payloads.
//! Content is fixed; the only per-request element is whether the caller is
//! an admin, which front-ends use to show curation links.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// An informational page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageView {
    /// Page slug (`index`, `about` or `rules`).
    pub page: String,
    pub title: String,
    pub body: String,
    /// Whether the caller is an admin. Front-ends use this to show
    /// curation links.
    pub viewer_is_admin: bool,
}

/// Build the pages router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/pages/:slug", get(get_page))
}

fn page_content(slug: &str) -> Option<(&'static str, &'static str)> {
    match slug {
        "index" => Some((
            "Welcome to the museum",
            "Browse the floors to discover our current expositions, or visit \
             an exposition to see the exhibits on display.",
        )),
        "about" => Some((
            "About the museum",
            "Our collection spans three public floors, with additional works \
             held in the storage reserve and on loan to partner museums.",
        )),
        "rules" => Some((
            "Visitor rules",
            "Photography without flash is permitted. Please do not touch the \
             exhibits. Expositions under restoration are closed to visitors.",
        )),
        _ => None,
    }
}

/// GET /v1/pages/:slug — Informational page.
#[utoipa::path(
    get,
    path = "/v1/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug: index, about or rules")),
    responses(
        (status = 200, description = "Page content", body = PageView),
        (status = 404, description = "Unknown page", body = crate::error::ErrorBody),
    ),
    tag = "pages"
)]
pub async fn get_page(
    caller: CallerIdentity,
    Path(slug): Path<String>,
) -> Result<Json<PageView>, AppError> {
    let (title, body) = page_content(&slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug} does not exist")))?;
    Ok(Json(PageView {
        page: slug,
        title: title.to_string(),
        body: body.to_string(),
        viewer_is_admin: caller.is_admin(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_slugs_resolve() {
        for slug in ["index", "about", "rules"] {
            assert!(page_content(slug).is_some(), "missing page {slug}");
        }
    }

    #[test]
    fn unknown_slug_is_none() {
        assert!(page_content("gift-shop").is_none());
    }
}
