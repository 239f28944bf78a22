// HTTP handlers for order and order-item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::orders::{OrderItem, OrderItemRequest, OrderRequest, OrderResponse};
use crate::AppState;

/// Handler for POST /api/orders
/// Creates an order together with its lines
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "User or product not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "orders"
)]
pub async fn create_order_handler(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Json(request): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    tracing::debug!("{} creating order for user {}", caller.username, request.user_id);

    let order = state.orders.create_order(request).await?;
    Ok(Json(order))
}

/// Handler for GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders with their lines", body = Vec<OrderResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "orders"
)]
pub async fn list_orders_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.list_orders().await?;
    Ok(Json(orders))
}

/// Handler for GET /api/orders/:id
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "orders"
)]
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.get_order(id).await?;
    Ok(Json(order))
}

/// Handler for PUT /api/orders/:id
/// Updates user, date and status of an order
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Order or user not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "orders"
)]
pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    tracing::debug!("Updating order with id: {}", id);

    let order = state.orders.update_order(id, request).await?;
    Ok(Json(order))
}

/// Handler for DELETE /api/orders/:id
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "orders"
)]
pub async fn delete_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting order with id: {}", id);

    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/order-items
#[utoipa::path(
    post,
    path = "/api/order-items",
    request_body = OrderItemRequest,
    responses(
        (status = 200, description = "Order item created", body = OrderItem),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller lacks a back-office role", body = crate::error::ErrorResponse),
        (status = 404, description = "Order or product not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "order-items"
)]
pub async fn create_order_item_handler(
    State(state): State<AppState>,
    Json(request): Json<OrderItemRequest>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = state.order_items.create_item(request).await?;
    Ok(Json(item))
}

/// Handler for GET /api/order-items
#[utoipa::path(
    get,
    path = "/api/order-items",
    responses(
        (status = 200, description = "All order items", body = Vec<OrderItem>),
        (status = 403, description = "Caller lacks a back-office role", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "order-items"
)]
pub async fn list_order_items_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderItem>>, ApiError> {
    let items = state.order_items.list_items().await?;
    Ok(Json(items))
}

/// Handler for GET /api/order-items/:id
#[utoipa::path(
    get,
    path = "/api/order-items/{id}",
    params(("id" = i64, Path, description = "Order item ID")),
    responses(
        (status = 200, description = "Order item found", body = OrderItem),
        (status = 404, description = "Order item not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "order-items"
)]
pub async fn get_order_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = state.order_items.get_item(id).await?;
    Ok(Json(item))
}

/// Handler for PUT /api/order-items/:id
#[utoipa::path(
    put,
    path = "/api/order-items/{id}",
    params(("id" = i64, Path, description = "Order item ID")),
    request_body = OrderItemRequest,
    responses(
        (status = 200, description = "Order item updated", body = OrderItem),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 404, description = "Order item, order or product not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "order-items"
)]
pub async fn update_order_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<OrderItemRequest>,
) -> Result<Json<OrderItem>, ApiError> {
    tracing::debug!("Updating order item with id: {}", id);

    let item = state.order_items.update_item(id, request).await?;
    Ok(Json(item))
}

/// Handler for DELETE /api/order-items/:id
#[utoipa::path(
    delete,
    path = "/api/order-items/{id}",
    params(("id" = i64, Path, description = "Order item ID")),
    responses(
        (status = 204, description = "Order item deleted"),
        (status = 404, description = "Order item not found", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "order-items"
)]
pub async fn delete_order_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting order item with id: {}", id);

    state.order_items.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
