use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::curation::CurationError;
use crate::generation::GenerationError;
use crate::persistence::TrackerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Curation error: {0}")]
    Curation(#[from] CurationError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Curation(e @ CurationError::UnknownItem { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
            }
            AppError::Curation(e) => (StatusCode::BAD_REQUEST, "INVALID_ACTION", e.to_string()),
            AppError::Tracker(e @ TrackerError::JobNotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
            }
            AppError::Tracker(e) => {
                tracing::error!("Tracker error: {e}");
                (StatusCode::BAD_GATEWAY, "TRACKER_ERROR", e.to_string())
            }
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "The cover letter service failed; your selection is unchanged".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::catalog::Source;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("blank".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CurationError::UnknownItem {
                origin: Source::Research,
                id: 9
            }
            .into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CurationError::ReadOnlySource(Source::Insight).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TrackerError::JobNotFound(3).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(TrackerError::Rejected("nope".to_string()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                GenerationError::Api {
                    status: 500,
                    message: "boom".to_string()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }
}
