use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use crate::AppState;

/// Header carrying the shared admin secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Shared-secret gate for admin routes. Handlers behind it receive an
/// already-authorized request and never re-check credentials.
#[derive(Clone)]
pub struct AdminGuard {
    password: Arc<String>,
}

impl AdminGuard {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Arc::new(password.into()),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.password.as_str() == candidate
    }
}

/// Route-layer middleware rejecting requests without the correct
/// `x-admin-password` header.
pub async fn require_admin(
    State(guard): State<AdminGuard>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());

    match supplied {
        Some(candidate) if guard.matches(candidate) => next.run(request).await,
        _ => {
            warn!(path = %request.uri().path(), "rejected admin request with bad credential");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Unauthorized"})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidatePasswordRequest {
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidatePasswordResponse {
    pub valid: bool,
}

/// Check a candidate admin password without granting anything; the client
/// uses this to unlock its admin UI.
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    request_body = ValidatePasswordRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidatePasswordResponse)
    ),
    tag = "auth"
)]
pub async fn validate_password(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePasswordRequest>,
) -> Json<ValidatePasswordResponse> {
    let valid = payload
        .password
        .map(|p| p == state.config.admin_password)
        .unwrap_or(false);
    Json(ValidatePasswordResponse { valid })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/validate", post(validate_password))
}
