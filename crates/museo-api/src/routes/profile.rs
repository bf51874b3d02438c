//! # Profile API
//!
//! Own-profile editing and public profile views. The caller edits the
//! profile their token is bound to; there is no editing of other accounts
//! here. Account lifecycle (registration, passwords) belongs to the identity
//! collaborator.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use museo_core::fields;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, UserRecord};

/// Request to update the caller's own profile.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileFields {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

impl Validate for ProfileFields {
    fn validate(&self) -> Result<(), String> {
        fields::validate_username(&self.username).map_err(|e| e.to_string())?;
        fields::validate_name("first_name", &self.first_name).map_err(|e| e.to_string())?;
        fields::validate_name("last_name", &self.last_name).map_err(|e| e.to_string())?;
        fields::validate_email(&self.email).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Public view of a user profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Whether the user belongs to the admin group.
    pub is_admin: bool,
}

impl From<&UserRecord> for ProfileView {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin(),
        }
    }
}

/// Response for a saved profile, with the profile view to land on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileSaved {
    #[serde(flatten)]
    pub profile: ProfileView,
    /// Path of the caller's public profile view.
    pub redirect: String,
}

/// Build the profile router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/profile", put(update_profile))
        .route("/v1/profiles/:username", get(get_profile))
}

/// PUT /v1/profile — Edit the caller's own profile.
///
/// The token must carry a username binding; service tokens cannot edit a
/// profile. A username already taken by another account is rejected with
/// 422 and nothing is persisted.
#[utoipa::path(
    put,
    path = "/v1/profile",
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Profile updated", body = ProfileSaved),
        (status = 401, description = "Token carries no username binding", body = crate::error::ErrorBody),
        (status = 404, description = "No account matches the token's username", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid fields or username taken", body = crate::error::ErrorBody),
    ),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ProfileFields>, JsonRejection>,
) -> Result<Json<ProfileSaved>, AppError> {
    let caller_username = caller.username.clone().ok_or_else(|| {
        AppError::Unauthorized("token carries no username binding".to_string())
    })?;
    let req = extract_validated_json(body)?;

    let user = state
        .users
        .find(|u| u.username == caller_username)
        .ok_or_else(|| {
            AppError::NotFound(format!("no account for username {caller_username}"))
        })?;

    // Reject before mutating: a failed rename must leave the record untouched.
    if req.username != user.username
        && state.users.find(|u| u.username == req.username).is_some()
    {
        return Err(AppError::Validation(format!(
            "username {} is already taken",
            req.username
        )));
    }

    let record = state
        .users
        .update(&user.id, |u| {
            u.username = req.username.clone();
            u.first_name = req.first_name.clone();
            u.last_name = req.last_name.clone();
            u.email = req.email.clone();
            u.updated_at = Utc::now();
        })
        .ok_or_else(|| {
            AppError::NotFound(format!("no account for username {caller_username}"))
        })?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::users::update_profile(pool, &record).await {
            tracing::error!(user_id = %record.id, error = %e, "failed to persist profile update");
            return Err(AppError::Internal(
                "profile updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    let redirect = format!("/v1/profiles/{}", record.username);
    Ok(Json(ProfileSaved {
        profile: ProfileView::from(&record),
        redirect,
    }))
}

/// GET /v1/profiles/:username — Public profile view.
#[utoipa::path(
    get,
    path = "/v1/profiles/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile found", body = ProfileView),
        (status = 404, description = "Unknown username", body = crate::error::ErrorBody),
    ),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(username): Path<String>,
) -> Result<Json<ProfileView>, AppError> {
    let user = state
        .users
        .find(|u| u.username == username)
        .ok_or_else(|| AppError::NotFound(format!("no account for username {username}")))?;
    Ok(Json(ProfileView::from(&user)))
}
