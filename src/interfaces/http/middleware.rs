//! Authentication middleware for Axum
//!
//! `auth_middleware` turns a bearer token into a [`Principal`] in the
//! request extensions; `require_role` gates a route group on that
//! principal's role.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, AuthError, JwtConfig};

/// Where unauthenticated clients are sent
pub const LOGIN_ROUTE: &str = "/api/v1/auth/login";

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The authenticated caller, available to handlers as `Extension<Principal>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(auth_header: Option<&str>, config: &JwtConfig) -> Result<Principal, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingToken)?;
    let token = extract_token(header).ok_or(AuthError::InvalidToken)?;

    let claims = verify_token(token, config).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }

    Ok(Principal {
        user_id: claims.user_id()?,
        role: claims.role()?,
        username: claims.username,
    })
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(auth_header, &auth_state.jwt_config) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            if let AuthError::UnknownRole(role) = &e {
                error!(role = %role, "Token carries a role outside the known set");
            }
            auth_error_response(e)
        }
    }
}

/// Role gate. Must be layered inside `auth_middleware`.
///
/// ```ignore
/// Router::new()
///     .route("/overview", get(overview))
///     .layer(middleware::from_fn_with_state(UserRole::Admin, require_role))
///     .layer(middleware::from_fn_with_state(auth_state, auth_middleware));
/// ```
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>() else {
        return auth_error_response(AuthError::MissingToken);
    };

    if principal.role != required {
        warn!(
            user_id = principal.user_id,
            role = %principal.role,
            required = %required,
            path = %request.uri().path(),
            "Role check failed"
        );
        return auth_error_response(AuthError::InsufficientPermissions);
    }

    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let message = error.to_string();
    match error {
        AuthError::InsufficientPermissions => {
            let body = Json(json!({
                "success": false,
                "data": null,
                "error": message,
            }));
            (StatusCode::FORBIDDEN, body).into_response()
        }
        _ => {
            let body = Json(json!({
                "success": false,
                "data": null,
                "error": message,
                "login_url": LOGIN_ROUTE,
            }));
            (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response()
        }
    }
}
