//! Mapping from domain errors to HTTP responses

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::{DomainError, VoteRejection};

/// Error half of every handler's `Result`
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::State(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::VoteRejected(reason) => match reason {
            VoteRejection::ElectionNotActive => StatusCode::CONFLICT,
            VoteRejection::AlreadyVoted => StatusCode::CONFLICT,
            VoteRejection::InvalidCandidate => StatusCode::UNPROCESSABLE_ENTITY,
        },
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a domain error into the `ApiResponse` error envelope.
///
/// Storage details are logged, not returned to the client.
pub fn api_error<T>(err: DomainError) -> ApiError<T> {
    let status = status_for(&err);
    let message = match &err {
        DomainError::Storage(_) => {
            error!(error = %err, "Request failed");
            "Internal server error".to_string()
        }
        DomainError::VoteRejected(reason) => reason.to_string(),
        DomainError::Validation(msg)
        | DomainError::Conflict(msg)
        | DomainError::State(msg)
        | DomainError::Unauthorized(msg)
        | DomainError::Forbidden(msg) => msg.clone(),
        DomainError::NotFound { .. } => err.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_rejections_map_per_reason() {
        let status = |r| status_for(&DomainError::VoteRejected(r));
        assert_eq!(status(VoteRejection::ElectionNotActive), StatusCode::CONFLICT);
        assert_eq!(status(VoteRejection::AlreadyVoted), StatusCode::CONFLICT);
        assert_eq!(
            status(VoteRejection::InvalidCandidate),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn storage_errors_are_masked() {
        let (status, Json(body)) =
            api_error::<()>(DomainError::Storage("disk I/O error at /var/db".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn not_found_keeps_entity_in_message() {
        let (status, Json(body)) = api_error::<()>(DomainError::not_found("Election", "id", 9));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.as_deref(), Some("Not found: Election with id=9"));
    }
}
