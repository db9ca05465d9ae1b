use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Vote;
use crate::interfaces::http::dto::{CandidateDto, ElectionDto};

/// What the voter sees: the open election and its candidates
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BallotDto {
    pub election: Option<ElectionDto>,
    pub candidates: Vec<CandidateDto>,
    pub has_voted: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CastVoteRequest {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub candidate_id: i32,
    /// Defaults to the election open now
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub election_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteDto {
    pub id: i32,
    pub election_id: i32,
    pub candidate_id: i32,
    pub cast_at: DateTime<Utc>,
}

impl From<Vote> for VoteDto {
    fn from(v: Vote) -> Self {
        Self {
            id: v.id,
            election_id: v.election_id,
            candidate_id: v.candidate_id,
            cast_at: v.cast_at,
        }
    }
}
