//! Voter API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use super::dto::{BallotDto, CastVoteRequest, VoteDto};
use crate::application::VoteLedger;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::dto::{CandidateDto, ElectionDto};
use crate::interfaces::http::middleware::Principal;
use crate::shared::time::LocalZone;

#[derive(Clone)]
pub struct VoterState {
    pub ledger: Arc<VoteLedger>,
    pub zone: LocalZone,
}

#[utoipa::path(
    get,
    path = "/api/v1/voter/ballot",
    tag = "Voter",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open election and its candidates", body = ApiResponse<BallotDto>),
        (status = 403, description = "Not a voter")
    )
)]
pub async fn ballot(
    State(state): State<VoterState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<BallotDto>>, ApiError<BallotDto>> {
    let now = Utc::now();
    let view = state
        .ledger
        .ballot(principal.user_id, now)
        .await
        .map_err(api_error)?;

    Ok(Json(ApiResponse::success(BallotDto {
        election: view
            .election
            .as_ref()
            .map(|e| ElectionDto::new(e, state.zone, now)),
        candidates: view.candidates.into_iter().map(CandidateDto::from).collect(),
        has_voted: view.has_voted,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/voter/votes",
    tag = "Voter",
    security(("bearer_auth" = [])),
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = ApiResponse<VoteDto>),
        (status = 409, description = "Election not open, or already voted"),
        (status = 422, description = "Candidate not on this ballot")
    )
)]
pub async fn cast_vote(
    State(state): State<VoterState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CastVoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VoteDto>>), ApiError<VoteDto>> {
    let vote = state
        .ledger
        .cast_vote(
            principal.user_id,
            request.candidate_id,
            request.election_id,
            Utc::now(),
        )
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(VoteDto::from(vote)))))
}
