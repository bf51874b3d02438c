//! # Exposition API
//!
//! Listing (the exhibits within an exposition) and admin curation.
//!
//! Reads apply the exposition visibility rule: closed expositions are 404
//! for visitors, listed for admins. Writes are admin-only and deny with 404
//! via [`crate::auth::require_admin`]. Deleting an exposition re-parents its
//! exhibits to the default storage exposition in an explicit two-step
//! transaction; the storage exposition itself can never be deleted.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use museo_core::{fields, visibility};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_admin, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::{paginate, PageQuery, PAGE_SIZE};
use crate::state::{AppState, ExhibitRecord, ExpositionRecord};

/// Request to create or update an exposition.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExpositionFields {
    pub title: String,
    pub description: String,
    /// Wire-level position (-1..=4).
    pub position: i16,
    #[serde(default)]
    pub on_restoration: bool,
    #[serde(default)]
    pub open: bool,
}

impl Validate for ExpositionFields {
    fn validate(&self) -> Result<(), String> {
        fields::validate_title(&self.title).map_err(|e| e.to_string())?;
        fields::validate_description(&self.description).map_err(|e| e.to_string())?;
        fields::parse_position(self.position).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Response for a saved exposition, with the listing view to land on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpositionSaved {
    #[serde(flatten)]
    pub exposition: ExpositionRecord,
    /// Path of this exposition's listing view.
    pub redirect: String,
}

/// Response for an exposition listing (the exhibits within).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpositionListing {
    pub exposition: ExpositionRecord,
    pub page: u32,
    pub page_size: usize,
    /// Total exhibits in this exposition (before pagination).
    pub total: usize,
    pub exhibits: Vec<ExhibitRecord>,
}

/// Response for a deleted exposition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpositionDeleted {
    pub deleted: Uuid,
    /// Exhibits re-parented to the default storage exposition.
    pub moved_exhibits: usize,
    /// Path of the floor listing the exposition was removed from.
    pub redirect: String,
}

/// Build the expositions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/expositions", post(create_exposition))
        .route(
            "/v1/expositions/:id",
            get(list_exposition).put(update_exposition).delete(delete_exposition),
        )
}

fn listing_path(id: Uuid) -> String {
    format!("/v1/expositions/{id}")
}

/// GET /v1/expositions/:id — List the exhibits in an exposition.
#[utoipa::path(
    get,
    path = "/v1/expositions/{id}",
    params(
        ("id" = Uuid, Path, description = "Exposition ID"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Exposition listing", body = ExpositionListing),
        (status = 404, description = "Unknown or closed exposition", body = crate::error::ErrorBody),
    ),
    tag = "expositions"
)]
pub async fn list_exposition(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ExpositionListing>, AppError> {
    let not_found = || AppError::NotFound(format!("exposition {id} does not exist"));

    let exposition = state.expositions.get(&id).ok_or_else(not_found)?;
    if !visibility::exposition_visible(exposition.open, caller.is_admin()) {
        // Closed expositions are indistinguishable from absent ones.
        return Err(not_found());
    }

    let mut exhibits: Vec<ExhibitRecord> = state
        .exhibits
        .list()
        .into_iter()
        .filter(|x| x.placement == id)
        .collect();
    exhibits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let page = query.page();
    let (exhibits, total) = paginate(exhibits, page);

    Ok(Json(ExpositionListing {
        exposition,
        page,
        page_size: PAGE_SIZE,
        total,
        exhibits,
    }))
}

/// POST /v1/expositions — Create an exposition (admin only).
#[utoipa::path(
    post,
    path = "/v1/expositions",
    request_body = ExpositionFields,
    responses(
        (status = 201, description = "Exposition created", body = ExpositionSaved),
        (status = 404, description = "Caller is not an admin", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorBody),
    ),
    tag = "expositions"
)]
pub async fn create_exposition(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ExpositionFields>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpositionSaved>), AppError> {
    require_admin(&caller)?;
    let req = extract_validated_json(body)?;

    let position = fields::parse_position(req.position)?;
    let now = Utc::now();
    let record = ExpositionRecord {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        position,
        on_restoration: req.on_restoration,
        // An exposition under restoration is stored closed no matter what
        // the form said.
        open: fields::effective_open(req.on_restoration, req.open),
        created_at: now,
        updated_at: now,
    };

    state.expositions.insert(record.id, record.clone());

    // Write-through. Failure is surfaced to the client because the in-memory
    // record would be lost on restart.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::expositions::insert(pool, &record).await {
            tracing::error!(exposition_id = %record.id, error = %e, "failed to persist exposition");
            return Err(AppError::Internal(
                "exposition recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    let redirect = listing_path(record.id);
    Ok((
        StatusCode::CREATED,
        Json(ExpositionSaved {
            exposition: record,
            redirect,
        }),
    ))
}

/// PUT /v1/expositions/:id — Update an exposition (admin only).
///
/// The storage exposition is refused with 409: its position and title are
/// the identity the delete guard and re-parenting rely on, so it is not
/// editable through the API.
#[utoipa::path(
    put,
    path = "/v1/expositions/{id}",
    params(("id" = Uuid, Path, description = "Exposition ID")),
    request_body = ExpositionFields,
    responses(
        (status = 200, description = "Exposition updated", body = ExpositionSaved),
        (status = 404, description = "Unknown exposition or non-admin caller", body = crate::error::ErrorBody),
        (status = 409, description = "The storage exposition cannot be modified", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorBody),
    ),
    tag = "expositions"
)]
pub async fn update_exposition(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<ExpositionFields>, JsonRejection>,
) -> Result<Json<ExpositionSaved>, AppError> {
    require_admin(&caller)?;
    let req = extract_validated_json(body)?;
    let position = fields::parse_position(req.position)?;

    let existing = state
        .expositions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("exposition {id} does not exist")))?;
    if state.is_default_storage(&existing) {
        return Err(AppError::Conflict(
            "the museum storage exposition cannot be modified".to_string(),
        ));
    }

    let record = state
        .expositions
        .update(&id, |e| {
            e.title = req.title.clone();
            e.description = req.description.clone();
            e.position = position;
            e.on_restoration = req.on_restoration;
            e.open = fields::effective_open(req.on_restoration, req.open);
            e.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound(format!("exposition {id} does not exist")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::expositions::update(pool, &record).await {
            tracing::error!(exposition_id = %id, error = %e, "failed to persist exposition update");
            return Err(AppError::Internal(
                "exposition updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    let redirect = listing_path(record.id);
    Ok(Json(ExpositionSaved {
        exposition: record,
        redirect,
    }))
}

/// DELETE /v1/expositions/:id — Delete an exposition (admin only).
///
/// Two-step transaction: the exposition's exhibits are re-parented to the
/// default storage exposition (created first if missing), then the row is
/// deleted. The storage exposition itself is refused with 409.
#[utoipa::path(
    delete,
    path = "/v1/expositions/{id}",
    params(("id" = Uuid, Path, description = "Exposition ID")),
    responses(
        (status = 200, description = "Exposition deleted", body = ExpositionDeleted),
        (status = 404, description = "Unknown exposition or non-admin caller", body = crate::error::ErrorBody),
        (status = 409, description = "The storage exposition cannot be deleted", body = crate::error::ErrorBody),
    ),
    tag = "expositions"
)]
pub async fn delete_exposition(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpositionDeleted>, AppError> {
    require_admin(&caller)?;

    let record = state
        .expositions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("exposition {id} does not exist")))?;

    if state.is_default_storage(&record) {
        return Err(AppError::Conflict(
            "the museum storage exposition cannot be deleted".to_string(),
        ));
    }

    // Capture the floor before deletion so the caller can land back on it.
    let floor_level = record.position.level();

    let storage = state.ensure_default_storage().await.map_err(|e| {
        tracing::error!(error = %e, "failed to ensure default storage exposition");
        AppError::Internal("could not prepare storage exposition".to_string())
    })?;

    let reparented_at = Utc::now();
    let moved = state.exhibits.update_all(|_, exhibit| {
        if exhibit.placement == id {
            exhibit.placement = storage.id;
            exhibit.updated_at = reparented_at;
            true
        } else {
            false
        }
    });
    state.expositions.remove(&id);

    if let Some(pool) = &state.db_pool {
        if let Err(e) =
            crate::db::expositions::delete_and_reparent(pool, id, storage.id, reparented_at).await
        {
            tracing::error!(exposition_id = %id, error = %e, "failed to persist exposition delete");
            return Err(AppError::Internal(
                "exposition deleted in-memory but database persist failed".to_string(),
            ));
        }
    }

    tracing::info!(
        exposition_id = %id,
        moved_exhibits = moved.len(),
        "deleted exposition, re-parented exhibits to storage"
    );

    Ok(Json(ExpositionDeleted {
        deleted: id,
        moved_exhibits: moved.len(),
        redirect: format!("/v1/floors/{floor_level}"),
    }))
}
