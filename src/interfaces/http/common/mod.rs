//! Shared building blocks for HTTP handlers

mod api_response;
mod error;
mod validated_json;

pub use api_response::ApiResponse;
pub use error::{api_error, status_for, ApiError};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
