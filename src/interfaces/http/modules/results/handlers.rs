//! Results API handlers (admin only)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::{csv_filename, TallyService};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};
use crate::interfaces::http::dto::TallyDto;
use crate::shared::time::LocalZone;

#[derive(Clone)]
pub struct ResultsState {
    pub results: Arc<TallyService>,
    pub zone: LocalZone,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResultsQuery {
    /// Defaults to the election currently open
    pub election_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/results",
    tag = "Results",
    security(("bearer_auth" = [])),
    params(ResultsQuery),
    responses(
        (status = 200, description = "Tally, or null when no election is selected or open", body = ApiResponse<TallyDto>),
        (status = 404, description = "Election not found")
    )
)]
pub async fn results(
    State(state): State<ResultsState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ApiResponse<Option<TallyDto>>>, ApiError<Option<TallyDto>>> {
    let now = Utc::now();
    let tally = match query.election_id {
        Some(id) => Some(state.results.tally(id).await.map_err(api_error)?),
        None => state.results.current_results(now).await.map_err(api_error)?,
    };

    Ok(Json(ApiResponse::success(
        tally.map(|t| TallyDto::new(&t, state.zone, now)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/elections/{id}/results",
    tag = "Results",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Election id")),
    responses(
        (status = 200, description = "Tally ordered by candidate id", body = ApiResponse<TallyDto>),
        (status = 404, description = "Election not found")
    )
)]
pub async fn election_results(
    State(state): State<ResultsState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TallyDto>>, ApiError<TallyDto>> {
    let tally = state.results.tally(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(TallyDto::new(
        &tally,
        state.zone,
        Utc::now(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/elections/{id}/results.csv",
    tag = "Results",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Election id")),
    responses(
        (status = 200, description = "`Candidate,Votes` CSV attachment", content_type = "text/csv"),
        (status = 404, description = "Election not found")
    )
)]
pub async fn export_csv(
    State(state): State<ResultsState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError<()>> {
    let body = state.results.results_csv(id).await.map_err(api_error)?;
    let disposition = format!("attachment; filename=\"{}\"", csv_filename(id));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
