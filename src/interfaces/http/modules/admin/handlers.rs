//! Admin API handlers

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    AddVoterRequest, AddedVoterResponse, CandidateForm, CreateAccountRequest,
    CreateElectionRequest, OverviewDto,
};
use crate::application::{
    CandidateService, ElectionService, NewAccount, PhotoUpload, UserService, VoterRegistration,
};
use crate::domain::{DomainError, UserRole};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::dto::{CandidateDto, CategoryDto, ElectionDto, UserDto};

#[derive(Clone)]
pub struct AdminState {
    pub users: Arc<UserService>,
    pub candidates: Arc<CandidateService>,
    pub elections: Arc<ElectionService>,
}

fn multipart_error<T>(e: MultipartError) -> ApiError<T> {
    (
        e.status(),
        Json(ApiResponse::error(format!("Invalid form data: {}", e.body_text()))),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Candidates, voters and elections", body = ApiResponse<OverviewDto>),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn overview(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<OverviewDto>>, ApiError<OverviewDto>> {
    let now = Utc::now();
    let zone = state.elections.zone();

    let candidates = state.candidates.list().await.map_err(api_error)?;
    let voters = state.users.list_voters().await.map_err(api_error)?;
    let elections = state.elections.list().await.map_err(api_error)?;
    let current = state.elections.current(now).await.map_err(api_error)?;

    Ok(Json(ApiResponse::success(OverviewDto {
        candidates: candidates.into_iter().map(CandidateDto::from).collect(),
        voters: voters.into_iter().map(UserDto::from).collect(),
        elections: elections
            .iter()
            .map(|e| ElectionDto::new(e, zone, now))
            .collect(),
        current_election: current.as_ref().map(|e| ElectionDto::new(e, zone, now)),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/candidates",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All candidates", body = ApiResponse<Vec<CandidateDto>>))
)]
pub async fn list_candidates(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<CandidateDto>>>, ApiError<Vec<CandidateDto>>> {
    let candidates = state.candidates.list().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        candidates.into_iter().map(CandidateDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/candidates",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body(content = CandidateForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Candidate added", body = ApiResponse<CandidateDto>),
        (status = 400, description = "Missing field or rejected photo"),
        (status = 413, description = "Upload too large")
    )
)]
pub async fn add_candidate(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CandidateDto>>), ApiError<CandidateDto>> {
    let mut name = None;
    let mut category = None;
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(field.text().await.map_err(multipart_error)?),
            Some("category") => category = Some(field.text().await.map_err(multipart_error)?),
            Some("photo") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() || !bytes.is_empty() {
                    photo = Some(PhotoUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let (Some(name), Some(category)) = (name, category) else {
        return Err(api_error(DomainError::Validation(
            "Fields 'name' and 'category' are required".into(),
        )));
    };

    let candidate = state
        .candidates
        .add(&name, &category, photo)
        .await
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CandidateDto::from(candidate))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/voters",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All voters", body = ApiResponse<Vec<UserDto>>))
)]
pub async fn list_voters(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError<Vec<UserDto>>> {
    let voters = state.users.list_voters().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        voters.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/voters",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = AddVoterRequest,
    responses(
        (status = 201, description = "Voter added", body = ApiResponse<AddedVoterResponse>),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn add_voter(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<AddVoterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddedVoterResponse>>), ApiError<AddedVoterResponse>> {
    let (user, temporary_password) = state
        .users
        .add_voter(VoterRegistration {
            name: request.name,
            email: request.email,
            username: request.username,
            id_number: request.id_number,
            password: request.password,
        })
        .await
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AddedVoterResponse {
            user: UserDto::from(user),
            temporary_password,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown or disallowed role"),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn create_account(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let role: UserRole = request.role.parse().map_err(api_error)?;

    let user = state
        .users
        .add_user(NewAccount {
            name: request.name,
            email: request.email,
            username: request.username,
            password: request.password,
            role,
        })
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserDto::from(user)))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryDto>>))
)]
pub async fn list_categories(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError<Vec<CategoryDto>>> {
    let categories = state.candidates.categories().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/elections",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All elections", body = ApiResponse<Vec<ElectionDto>>))
)]
pub async fn list_elections(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<ElectionDto>>>, ApiError<Vec<ElectionDto>>> {
    let now = Utc::now();
    let zone = state.elections.zone();
    let elections = state.elections.list().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        elections
            .iter()
            .map(|e| ElectionDto::new(e, zone, now))
            .collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/elections",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateElectionRequest,
    responses(
        (status = 201, description = "Election scheduled", body = ApiResponse<ElectionDto>),
        (status = 400, description = "Unparsable time or end before start"),
        (status = 409, description = "Overlaps another election in the category")
    )
)]
pub async fn create_election(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<CreateElectionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ElectionDto>>), ApiError<ElectionDto>> {
    let election = state
        .elections
        .schedule(&request.category, &request.start_time, &request.end_time)
        .await
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ElectionDto::new(
            &election,
            state.elections.zone(),
            Utc::now(),
        ))),
    ))
}
