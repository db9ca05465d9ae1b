//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, SignupRequest};
use crate::application::{UserService, VoterRegistration};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::dto::UserDto;
use crate::interfaces::http::middleware::Principal;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError<LoginResponse>> {
    let auth = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(api_error)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserDto::from(auth.user),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Voter registered", body = ApiResponse<UserDto>),
        (status = 409, description = "Username or email taken"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn signup(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let user = state
        .users
        .signup_voter(VoterRegistration {
            name: request.name,
            email: request.email,
            username: request.username,
            id_number: request.id_number,
            password: Some(request.password),
        })
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserDto::from(user)))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AuthHandlerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let user = state.users.me(principal.user_id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
