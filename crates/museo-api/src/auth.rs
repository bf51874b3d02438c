//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with a two-role model.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {role}:{username}:{secret}   — role is "visitor" or "admin"
//! Bearer {secret}                      — legacy format (treated as admin)
//! ```
//!
//! The username binds the token to a user record for the profile surface;
//! it may be empty for service tokens that never edit a profile.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl
//! — the viewer is always an explicit parameter, never ambient state.
//!
//! ## Admin gate
//!
//! Curation endpoints call [`require_admin`], which denies with a 404 (not a
//! 403) so non-admins cannot distinguish restricted pages from absent ones.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles in the catalog, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Visitor < Admin`. This enables `>=` comparison for access checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Any authenticated viewer: may browse public floors, open expositions,
    /// and exhibit details, and edit their own profile.
    Visitor,
    /// Member of the admin group: full catalog visibility plus curation rights.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Admin => "admin",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the auth context
/// and available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role in the system.
    pub role: Role,
    /// The username this token is bound to. `None` for service tokens;
    /// required for profile editing.
    pub username: Option<String>,
}

impl CallerIdentity {
    /// The single reusable admin predicate. Every boundary check goes
    /// through here instead of re-testing group membership inline.
    pub fn is_admin(&self) -> bool {
        self.role >= Role::Admin
    }
}

/// Axum `FromRequestParts` implementation for `CallerIdentity`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Admin gate for curation endpoints.
///
/// Denial is a 404, not a 403: restricted pages must be indistinguishable
/// from pages that do not exist.
pub fn require_admin(caller: &CallerIdentity) -> Result<(), AppError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::NotFound("page not found".to_string()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token in format `{role}:{username}:{secret}` or `{secret}` (legacy).
///
/// Legacy tokens (without role prefix) are treated as `Admin` for backward
/// compatibility with existing deployments.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret.
        1 => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::Admin,
                    username: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // New format: role:username:secret (username may be empty)
        3 => {
            let role_str = parts[0];
            let username = parts[1];
            let secret = parts[2];

            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role = match role_str {
                "admin" => Role::Admin,
                "visitor" => Role::Visitor,
                other => return Err(format!("unknown role: {other}")),
            };

            let username = if username.is_empty() {
                None
            } else {
                museo_core::fields::validate_username(username)
                    .map_err(|e| format!("invalid username in token: {e}"))?;
                Some(username.to_string())
            };

            Ok(CallerIdentity { role, username })
        }
        _ => Err("invalid token format — expected {role}:{username}:{secret} or {secret}".into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract `CallerIdentity` (role + username binding)
/// and injects it into request extensions for downstream handlers.
///
/// When `AuthConfig.token` is `None`, all requests are allowed with `Admin`
/// identity (auth disabled / development mode).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            // Auth disabled — inject Admin identity for full access.
            request.extensions_mut().insert(CallerIdentity {
                role: Role::Admin,
                username: None,
            });
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(token: Option<String>) -> Router {
        let auth_config = AuthConfig { token };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn missing_authorization_header_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing"));
    }

    #[tokio::test]
    async fn invalid_token_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Bearer scheme"));
    }

    #[tokio::test]
    async fn auth_disabled_allows_all_requests() {
        let app = test_app(None);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn constant_time_eq_identical_tokens() {
        assert!(constant_time_token_eq(
            "secret-token-123",
            "secret-token-123"
        ));
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(!constant_time_token_eq("secret", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_empty() {
        assert!(!constant_time_token_eq("", "secret-token-123"));
    }

    // ── Role tests ───────────────────────────────────────────────

    #[test]
    fn role_ordering_is_correct() {
        assert!(Role::Visitor < Role::Admin);
    }

    #[test]
    fn role_as_str() {
        assert_eq!(Role::Visitor.as_str(), "visitor");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    // ── CallerIdentity tests ─────────────────────────────────────

    #[test]
    fn admin_predicate() {
        let admin = CallerIdentity {
            role: Role::Admin,
            username: None,
        };
        let visitor = CallerIdentity {
            role: Role::Visitor,
            username: Some("bob".to_string()),
        };
        assert!(admin.is_admin());
        assert!(!visitor.is_admin());
    }

    #[test]
    fn require_admin_denies_with_not_found() {
        let visitor = CallerIdentity {
            role: Role::Visitor,
            username: Some("bob".to_string()),
        };
        match require_admin(&visitor) {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }

        let admin = CallerIdentity {
            role: Role::Admin,
            username: None,
        };
        assert!(require_admin(&admin).is_ok());
    }

    // ── parse_bearer_token tests ─────────────────────────────────

    #[test]
    fn parse_bearer_token_legacy_format() {
        let identity = parse_bearer_token("my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.username.is_none());
    }

    #[test]
    fn parse_bearer_token_new_format_admin() {
        let identity = parse_bearer_token("admin:alice:my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.username.as_deref(), Some("alice"));
    }

    #[test]
    fn parse_bearer_token_new_format_visitor() {
        let identity = parse_bearer_token("visitor:bob:my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Visitor);
        assert_eq!(identity.username.as_deref(), Some("bob"));
    }

    #[test]
    fn parse_bearer_token_empty_username() {
        let identity = parse_bearer_token("visitor::my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Visitor);
        assert!(identity.username.is_none());
    }

    #[test]
    fn parse_bearer_token_wrong_secret() {
        let result = parse_bearer_token("admin:alice:wrong", "my-secret");
        assert!(result.is_err());
    }

    #[test]
    fn parse_bearer_token_unknown_role() {
        let result = parse_bearer_token("superadmin:alice:my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("unknown role"));
    }

    #[test]
    fn parse_bearer_token_bad_username() {
        let result = parse_bearer_token("visitor:bad user:my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("invalid username"));
    }

    #[test]
    fn parse_bearer_token_two_parts_rejected() {
        let result = parse_bearer_token("role:secret", "secret");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn middleware_visitor_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer visitor:bob:my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_unknown_role_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer curator:alice:my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
