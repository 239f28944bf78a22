// HTTP handlers for product endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::products::{Product, ProductRequest};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller lacks a staff role", body = crate::error::ErrorResponse),
        (status = 404, description = "Referenced category not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    tracing::debug!("Creating product: {}", payload.name);

    let product = state.products.create(payload).await?;
    Ok(Json(product))
}

/// Handler for GET /api/products
/// Public listing of every product
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list().await?;

    tracing::debug!("Retrieved {} products", products.len());
    Ok(Json(products))
}

/// Handler for GET /api/products/:id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.get(id).await?;
    Ok(Json(product))
}

/// Handler for PUT /api/products/:id
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 404, description = "Product or category not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    tracing::debug!("Updating product with id: {}", id);

    let product = state.products.update(id, payload).await?;
    Ok(Json(product))
}

/// Handler for DELETE /api/products/:id
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Product is referenced by order items", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting product with id: {}", id);

    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
