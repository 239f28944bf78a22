// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::auth::{
    error::AuthError,
    models::{LoginRequest, LoginResponse},
};
use crate::AppState;

/// Handler for POST /api/auth/login
/// Exchanges credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    tracing::debug!("Login attempt for {}", request.username);

    let issued = state.auth.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}
