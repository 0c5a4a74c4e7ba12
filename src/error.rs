//! Error types for the analytics service.
//!
//! `AnalyticsError` and `ValidationError` are per-request conditions caused by
//! the data a caller asked about or submitted. They are deterministic and are
//! never retried. `ApiError` is what handlers return; it maps every failure to
//! an HTTP status and a `{"detail": ...}` body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ---

/// Failures of the analytics computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// No readings match the requested identifier.
    #[error("No data found for the given {what}: {id}")]
    NotFound { what: &'static str, id: String },

    /// Readings exist but are too few or too incomplete for the derivation.
    #[error("Not enough data to {0}")]
    InsufficientData(&'static str),
}

/// Reasons an ingested reading is rejected before normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("leaf_count must not be negative (got {0})")]
    NegativeLeafCount(i32),

    #[error("{field} must be within ±{limit} (got {value})")]
    OutOfRange {
        field: &'static str,
        limit: f64,
        value: f64,
    },

    #[error("batch item {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body missing, not JSON, or not shaped like the expected payload.
    #[error("{}", .0.body_text())]
    BadRequest(#[from] JsonRejection),

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    /// Reading store failure; details are logged, not returned.
    #[error("Reading store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            ApiError::Analytics(AnalyticsError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Analytics(AnalyticsError::InsufficientData(_)) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(rejection) => rejection.status(),
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        let detail = match &self {
            ApiError::Store(e) => {
                tracing::error!("Reading store failure: {:#}", e);
                "Internal server error".to_string()
            }
            other => {
                tracing::debug!("Request failed with {}: {}", status, other);
                other.to_string()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
