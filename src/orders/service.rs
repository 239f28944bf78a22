use chrono::Utc;
use validator::Validate;

use crate::error::ApiError;
use crate::orders::{
    OrderItem, OrderItemRequest, OrderItemsRepository, OrderRequest, OrderResponse,
    OrdersRepository,
};

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
}

impl OrderService {
    /// Create a new OrderService
    pub fn new(orders_repo: OrdersRepository) -> Self {
        Self { orders_repo }
    }

    /// Create an order and its lines
    ///
    /// # Validation
    /// - `status` is 1 to 50 characters
    /// - every line has a positive quantity and a non-negative price
    /// - the user and every referenced product must exist (404 otherwise)
    /// - `order_date` defaults to the current UTC time
    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderResponse, ApiError> {
        request.validate()?;

        let order_date = request
            .order_date
            .unwrap_or_else(|| Utc::now().naive_utc());

        let order = self
            .orders_repo
            .create(request.user_id, order_date, &request.status, &request.items)
            .await?;

        tracing::info!(
            "Created order {} for user {} with {} items",
            order.id,
            order.user_id,
            order.order_items.len()
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<OrderResponse, ApiError> {
        self.orders_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", id))
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderResponse>, ApiError> {
        self.orders_repo.find_all().await
    }

    /// Update the order header; lines in the request are ignored
    pub async fn update_order(
        &self,
        id: i64,
        request: OrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        request.validate()?;

        let order = self
            .orders_repo
            .update(id, request.user_id, request.order_date, &request.status)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", id))?;

        tracing::info!("Updated order {} (status {})", id, order.status);
        Ok(order)
    }

    pub async fn delete_order(&self, id: i64) -> Result<(), ApiError> {
        if !self.orders_repo.delete(id).await? {
            return Err(ApiError::not_found("Order", id));
        }

        tracing::info!("Deleted order {}", id);
        Ok(())
    }
}

/// Service for individual order lines
#[derive(Clone)]
pub struct OrderItemService {
    items_repo: OrderItemsRepository,
}

impl OrderItemService {
    /// Create a new OrderItemService
    pub fn new(items_repo: OrderItemsRepository) -> Self {
        Self { items_repo }
    }

    pub async fn create_item(&self, request: OrderItemRequest) -> Result<OrderItem, ApiError> {
        request.validate()?;

        let item = self.items_repo.create(&request).await?;
        tracing::info!("Added item {} to order {}", item.id, item.order_id);
        Ok(item)
    }

    pub async fn get_item(&self, id: i64) -> Result<OrderItem, ApiError> {
        self.items_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("OrderItem", id))
    }

    pub async fn list_items(&self) -> Result<Vec<OrderItem>, ApiError> {
        self.items_repo.find_all().await
    }

    pub async fn update_item(
        &self,
        id: i64,
        request: OrderItemRequest,
    ) -> Result<OrderItem, ApiError> {
        request.validate()?;

        let item = self
            .items_repo
            .update(id, &request)
            .await?
            .ok_or_else(|| ApiError::not_found("OrderItem", id))?;

        tracing::info!("Updated order item {}", id);
        Ok(item)
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        if !self.items_repo.delete(id).await? {
            return Err(ApiError::not_found("OrderItem", id));
        }

        tracing::info!("Deleted order item {}", id);
        Ok(())
    }
}
