//! Admin DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::interfaces::http::dto::{CandidateDto, ElectionDto, UserDto};

/// `multipart/form-data` body of `POST /api/v1/admin/candidates`
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CandidateForm {
    pub name: String,
    /// Category name; created on first use
    pub category: String,
    /// png, jpg, jpeg or gif
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddVoterRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 64, message = "is required"))]
    pub id_number: String,
    /// Omit to have a temporary password generated
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddedVoterResponse {
    pub user: UserDto,
    /// Only present when the password was generated; shown once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Admin or candidate account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    /// `admin` or `candidate`
    pub role: String,
}

/// Times are `YYYY-MM-DDTHH:MM` in the configured local zone, or RFC 3339
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateElectionRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub category: String,
    #[validate(length(min = 1, message = "is required"))]
    pub start_time: String,
    #[validate(length(min = 1, message = "is required"))]
    pub end_time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewDto {
    pub candidates: Vec<CandidateDto>,
    pub voters: Vec<UserDto>,
    pub elections: Vec<ElectionDto>,
    pub current_election: Option<ElectionDto>,
}
