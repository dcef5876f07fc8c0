use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    /// Nothing pending for this driver and date. A no-work signal, not a
    /// failure; the admin UI renders it differently from provider errors.
    #[error("no pending assignments for driver {driver_id} on {date}")]
    NoPendingAssignments { driver_id: Uuid, date: NaiveDate },

    /// Every candidate stop lacked usable coordinates.
    #[error("no geocoded stops: all pending assignments are missing coordinates")]
    NoGeocodedStops,

    /// The optimization provider returned a non-"Ok" code or was unreachable.
    /// The provider's message is passed through verbatim for admin visibility.
    #[error("route provider error: {0}")]
    Provider(String),

    /// The provider's waypoint accounting did not match the submitted stops.
    /// Fatal: a mismatched mapping is never partially trusted.
    #[error("waypoint correlation failed: {0}")]
    Correlation(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable tag so the admin UI can branch on the outcome
    /// without parsing human-readable text.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NoPendingAssignments { .. } => "no_pending_assignments",
            AppError::NoGeocodedStops => "no_geocoded_stops",
            AppError::Provider(_) => "provider_error",
            AppError::Correlation(_) => "correlation_error",
            AppError::Store(_) => "store_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoPendingAssignments { .. } | AppError::NoGeocodedStops => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Provider(_) | AppError::Correlation(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
