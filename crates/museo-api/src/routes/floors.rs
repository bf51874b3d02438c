//! # Floor Listings
//!
//! Lists the expositions placed on a floor, each annotated with its exhibit
//! count. The floor visibility rule runs before any data is touched: the
//! storage reserve (`0`) and the unassigned pool (`-1`) exist only for
//! admins, and an undefined level is not-found for everyone — a visitor
//! probing floor `0` gets the same 404 as anyone probing floor `9`.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use museo_core::{visibility, FloorPosition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::routes::{paginate, PageQuery, PAGE_SIZE};
use crate::state::{AppState, ExpositionRecord};

/// An exposition in a floor listing, annotated with its exhibit count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FloorExposition {
    #[serde(flatten)]
    pub exposition: ExpositionRecord,
    /// Number of exhibits currently placed in this exposition.
    pub exhibit_count: usize,
}

/// Response for a floor listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FloorListing {
    /// Machine-readable floor name.
    pub floor: String,
    /// Wire-level floor number.
    pub floor_level: i16,
    /// Human-readable floor name for display.
    pub display_name: String,
    pub page: u32,
    pub page_size: usize,
    /// Total expositions on this floor (before pagination).
    pub total: usize,
    pub expositions: Vec<FloorExposition>,
}

/// Build the floors router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/floors/:level", get(list_floor))
}

/// GET /v1/floors/:level — List expositions on a floor.
#[utoipa::path(
    get,
    path = "/v1/floors/{level}",
    params(
        ("level" = i16, Path, description = "Wire-level floor number (-1..=4)"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Floor listing", body = FloorListing),
        (status = 404, description = "Undefined or restricted floor", body = crate::error::ErrorBody),
    ),
    tag = "floors"
)]
pub async fn list_floor(
    State(state): State<AppState>,
    caller: CallerIdentity,
    level: Result<Path<i16>, PathRejection>,
    Query(query): Query<PageQuery>,
) -> Result<Json<FloorListing>, AppError> {
    // A level that is not even an integer is just another undefined floor.
    let Path(level) =
        level.map_err(|_| AppError::NotFound("floor does not exist".to_string()))?;

    // Same message for "undefined" and "restricted": a visitor must not be
    // able to tell which floors exist beyond the ones they may see.
    let not_found = || AppError::NotFound(format!("floor {level} does not exist"));

    let position = FloorPosition::from_level(level).ok_or_else(not_found)?;
    if !visibility::floor_visible(position, caller.is_admin()) {
        return Err(not_found());
    }

    let mut expositions: Vec<ExpositionRecord> = state
        .expositions
        .list()
        .into_iter()
        .filter(|e| e.position == position && !e.on_restoration && e.open)
        .collect();
    expositions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let page = query.page();
    let (page_items, total) = paginate(expositions, page);

    let expositions = page_items
        .into_iter()
        .map(|exposition| {
            let exhibit_count = state
                .exhibits
                .list()
                .iter()
                .filter(|x| x.placement == exposition.id)
                .count();
            FloorExposition {
                exposition,
                exhibit_count,
            }
        })
        .collect();

    Ok(Json(FloorListing {
        floor: position.as_str().to_string(),
        floor_level: position.level(),
        display_name: position.display_name().to_string(),
        page,
        page_size: PAGE_SIZE,
        total,
        expositions,
    }))
}
