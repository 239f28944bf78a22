// HTTP handlers for category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::categories::{Category, CategoryRequest};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller lacks a staff role", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    tracing::debug!("Creating category: {}", payload.name);

    let category = state.categories.create(payload).await?;
    Ok(Json(category))
}

/// Handler for GET /api/categories
/// Public listing of every category
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<Category>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.categories.list().await?;

    tracing::debug!("Retrieved {} categories", categories.len());
    Ok(Json(categories))
}

/// Handler for GET /api/categories/:id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = state.categories.get(id).await?;
    Ok(Json(category))
}

/// Handler for PUT /api/categories/:id
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    tracing::debug!("Updating category with id: {}", id);

    let category = state.categories.update(id, payload).await?;
    Ok(Json(category))
}

/// Handler for DELETE /api/categories/:id
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting category with id: {}", id);

    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
