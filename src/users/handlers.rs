// HTTP handlers for user endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::users::{UserRegistration, UserResponse, UserUpdate};
use crate::AppState;

/// Handler for POST /api/users
/// Registers a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRegistration,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Registering user: {}", payload.username);

    let user = state.users.register(payload).await?;
    let location = format!("/api/users/{}", user.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// Handler for GET /api/users
/// Lists all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    tracing::debug!("Listing users for {}", caller.username);

    let users = state.users.list().await?;
    Ok(Json(users))
}

/// Handler for GET /api/users/:id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::debug!("Fetching user with id: {}", id);

    let user = state.users.get(id).await?;
    Ok(Json(user))
}

/// Handler for PATCH /api/users/:id
/// Partially updates a user; roles, when given, replace the current set
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::debug!("Updating user with id: {}", id);

    let user = state.users.update(id, payload).await?;
    Ok(Json(user))
}

/// Handler for DELETE /api/users/:id
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting user with id: {}", id);

    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
