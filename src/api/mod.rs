//! REST API endpoints.
//!
//! Axum-based HTTP API over the club's roster, match schedule, match
//! records and derived statistics.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::storage::StoreError;
use routes::{members, records, schedule, stats};
use state::AppState;

/// Header carrying the admin token for destructive operations.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Invalid(msg) => ApiError::BadRequest(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => {
                error!("Store failure: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Reject destructive requests that lack the configured admin token.
/// Without a configured token every request passes.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.config.server.admin_token.as_deref() else {
        return Ok(());
    };

    let given = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if given == Some(expected) {
        Ok(())
    } else {
        warn!("Rejected destructive request without a valid admin token");
        Err(ApiError::Unauthorized(format!(
            "missing or wrong {} header",
            ADMIN_TOKEN_HEADER
        )))
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid cors_origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(health))
        // Roster
        .route(
            "/api/members",
            get(members::list_members).post(members::create_member),
        )
        .route("/api/members/upload", post(members::upload_members))
        .route(
            "/api/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Schedule
        .route(
            "/api/schedule",
            get(schedule::list_matches).post(schedule::create_match),
        )
        .route(
            "/api/schedule/:id",
            get(schedule::get_match)
                .put(schedule::update_match)
                .delete(schedule::delete_match),
        )
        .route(
            "/api/schedule/:id/goals",
            get(schedule::match_goals).post(schedule::create_goal),
        )
        .route(
            "/api/schedule/:id/entry",
            get(schedule::match_entries).post(schedule::create_entry),
        )
        .route(
            "/api/schedule/:id/entry/:entry_id",
            delete(schedule::delete_entry),
        )
        .route(
            "/api/schedule/:id/turnovers",
            get(schedule::match_turnovers).post(schedule::upsert_turnover),
        )
        .route(
            "/api/schedule/:id/ratings",
            get(schedule::match_ratings).post(schedule::upsert_rating),
        )
        .route("/api/schedule/:id/mom", post(schedule::set_mom))
        .route("/api/schedule/:id/score", get(schedule::match_score))
        // Raw records
        .route("/api/records/goals", get(records::list_goals))
        .route("/api/records/goals/reset", post(records::reset_goals))
        .route("/api/records/entries", get(records::list_entries))
        .route("/api/records/turnovers", get(records::list_turnovers))
        .route("/api/records/ratings", get(records::list_ratings))
        // Statistics
        .route("/api/stats", get(stats::club_stats))
        .route("/api/stats/teams/:team", get(stats::team_stats))
        .route("/api/stats/players", get(stats::player_stats))
        .route("/api/stats/players/:id", get(stats::player_detail))
        .route("/api/stats/rankings", get(stats::rankings))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
