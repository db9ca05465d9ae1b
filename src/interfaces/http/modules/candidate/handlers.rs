use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::TallyService;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};
use crate::interfaces::http::dto::{CandidateDto, ElectionDto, TallyDto, UserDto};
use crate::interfaces::http::middleware::Principal;
use crate::shared::time::LocalZone;

#[derive(Clone)]
pub struct CandidateState {
    pub results: Arc<TallyService>,
    pub zone: LocalZone,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub user: UserDto,
    /// Ballot entry with the same name as the account, if any
    pub candidate: Option<CandidateDto>,
    pub election: Option<ElectionDto>,
    pub tally: Option<TallyDto>,
}

#[utoipa::path(
    get,
    path = "/api/v1/candidate/dashboard",
    tag = "Candidate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own ballot entry and live standings", body = ApiResponse<DashboardDto>),
        (status = 403, description = "Not a candidate")
    )
)]
pub async fn dashboard(
    State(state): State<CandidateState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError<DashboardDto>> {
    let now = Utc::now();
    let dashboard = state
        .results
        .candidate_dashboard(principal.user_id, now)
        .await
        .map_err(api_error)?;

    Ok(Json(ApiResponse::success(DashboardDto {
        user: UserDto::from(dashboard.user),
        candidate: dashboard.candidate.map(CandidateDto::from),
        election: dashboard
            .election
            .as_ref()
            .map(|e| ElectionDto::new(e, state.zone, now)),
        tally: dashboard
            .tally
            .as_ref()
            .map(|t| TallyDto::new(t, state.zone, now)),
    })))
}
