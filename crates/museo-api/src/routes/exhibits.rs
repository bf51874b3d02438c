//! # Exhibit API
//!
//! Exhibit detail and admin curation.
//!
//! The detail view has no open/closed gate: any authenticated viewer can
//! fetch any exhibit, even one placed in a closed exposition. That asymmetry
//! with the exposition listing is inherited from the catalog this replaces
//! and is preserved on purpose (see `museo_core::visibility`). Writes are
//! admin-only and deny with 404.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use museo_core::fields;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_admin, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, ExhibitRecord};

/// Request to create or update an exhibit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExhibitFields {
    pub title: String,
    pub description: String,
    /// Optional reference to an externally hosted image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Exposition this exhibit is placed in. Must reference an existing
    /// exposition.
    pub placement: Uuid,
}

impl Validate for ExhibitFields {
    fn validate(&self) -> Result<(), String> {
        fields::validate_title(&self.title).map_err(|e| e.to_string())?;
        fields::validate_description(&self.description).map_err(|e| e.to_string())?;
        if let Some(url) = &self.image_url {
            if url.trim().is_empty() {
                return Err("image_url must not be empty when present".to_string());
            }
        }
        Ok(())
    }
}

/// Response for a saved exhibit, with the detail view to land on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExhibitSaved {
    #[serde(flatten)]
    pub exhibit: ExhibitRecord,
    /// Path of this exhibit's detail view.
    pub redirect: String,
}

/// Response for a deleted exhibit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExhibitDeleted {
    pub deleted: Uuid,
    /// Path of the listing of the exposition the exhibit was removed from.
    pub redirect: String,
}

/// Build the exhibits router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/exhibits", post(create_exhibit))
        .route(
            "/v1/exhibits/:id",
            get(get_exhibit).put(update_exhibit).delete(delete_exhibit),
        )
}

fn detail_path(id: Uuid) -> String {
    format!("/v1/exhibits/{id}")
}

/// Validate that the placement references an existing exposition.
///
/// A bad placement is a 422, not a 404: the form is wrong, the page exists.
fn check_placement(state: &AppState, placement: Uuid) -> Result<(), AppError> {
    if state.expositions.contains(&placement) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "placement {placement} does not reference an existing exposition"
        )))
    }
}

/// GET /v1/exhibits/:id — Exhibit detail.
#[utoipa::path(
    get,
    path = "/v1/exhibits/{id}",
    params(("id" = Uuid, Path, description = "Exhibit ID")),
    responses(
        (status = 200, description = "Exhibit found", body = ExhibitRecord),
        (status = 404, description = "Unknown exhibit", body = crate::error::ErrorBody),
    ),
    tag = "exhibits"
)]
pub async fn get_exhibit(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ExhibitRecord>, AppError> {
    let exhibit = state
        .exhibits
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("exhibit {id} does not exist")))?;
    Ok(Json(exhibit))
}

/// POST /v1/exhibits — Create an exhibit (admin only).
#[utoipa::path(
    post,
    path = "/v1/exhibits",
    request_body = ExhibitFields,
    responses(
        (status = 201, description = "Exhibit created", body = ExhibitSaved),
        (status = 404, description = "Caller is not an admin", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorBody),
    ),
    tag = "exhibits"
)]
pub async fn create_exhibit(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ExhibitFields>, JsonRejection>,
) -> Result<(StatusCode, Json<ExhibitSaved>), AppError> {
    require_admin(&caller)?;
    let req = extract_validated_json(body)?;
    check_placement(&state, req.placement)?;

    let now = Utc::now();
    let record = ExhibitRecord {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        image_url: req.image_url,
        placement: req.placement,
        created_at: now,
        updated_at: now,
    };

    state.exhibits.insert(record.id, record.clone());

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::exhibits::insert(pool, &record).await {
            tracing::error!(exhibit_id = %record.id, error = %e, "failed to persist exhibit");
            return Err(AppError::Internal(
                "exhibit recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    let redirect = detail_path(record.id);
    Ok((
        StatusCode::CREATED,
        Json(ExhibitSaved {
            exhibit: record,
            redirect,
        }),
    ))
}

/// PUT /v1/exhibits/:id — Update an exhibit (admin only).
#[utoipa::path(
    put,
    path = "/v1/exhibits/{id}",
    params(("id" = Uuid, Path, description = "Exhibit ID")),
    request_body = ExhibitFields,
    responses(
        (status = 200, description = "Exhibit updated", body = ExhibitSaved),
        (status = 404, description = "Unknown exhibit or non-admin caller", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorBody),
    ),
    tag = "exhibits"
)]
pub async fn update_exhibit(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<ExhibitFields>, JsonRejection>,
) -> Result<Json<ExhibitSaved>, AppError> {
    require_admin(&caller)?;
    let req = extract_validated_json(body)?;
    check_placement(&state, req.placement)?;

    let record = state
        .exhibits
        .update(&id, |x| {
            x.title = req.title.clone();
            x.description = req.description.clone();
            x.image_url = req.image_url.clone();
            x.placement = req.placement;
            x.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound(format!("exhibit {id} does not exist")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::exhibits::update(pool, &record).await {
            tracing::error!(exhibit_id = %id, error = %e, "failed to persist exhibit update");
            return Err(AppError::Internal(
                "exhibit updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    let redirect = detail_path(record.id);
    Ok(Json(ExhibitSaved {
        exhibit: record,
        redirect,
    }))
}

/// DELETE /v1/exhibits/:id — Delete an exhibit (admin only).
#[utoipa::path(
    delete,
    path = "/v1/exhibits/{id}",
    params(("id" = Uuid, Path, description = "Exhibit ID")),
    responses(
        (status = 200, description = "Exhibit deleted", body = ExhibitDeleted),
        (status = 404, description = "Unknown exhibit or non-admin caller", body = crate::error::ErrorBody),
    ),
    tag = "exhibits"
)]
pub async fn delete_exhibit(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ExhibitDeleted>, AppError> {
    require_admin(&caller)?;

    // Capture the placement before deletion so the caller can land on the
    // exposition the exhibit came from.
    let record = state
        .exhibits
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("exhibit {id} does not exist")))?;
    let placement = record.placement;

    state.exhibits.remove(&id);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::exhibits::delete(pool, id).await {
            tracing::error!(exhibit_id = %id, error = %e, "failed to persist exhibit delete");
            return Err(AppError::Internal(
                "exhibit deleted in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(ExhibitDeleted {
        deleted: id,
        redirect: format!("/v1/expositions/{placement}"),
    }))
}
