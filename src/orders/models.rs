use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_non_negative_price, validate_not_blank};

/// Order header as stored
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub order_date: NaiveDateTime,
    pub status: String,
}

/// A line of an order; also the order-item response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price recorded when the line was written
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Line submitted together with a new order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderLine {
    pub product_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Request DTO for creating or updating an order
///
/// On update only `user_id`, `order_date` and `status` are applied; lines are
/// managed through the order-item endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderRequest {
    pub user_id: i64,

    /// Defaults to the current time on create, left unchanged on update
    pub order_date: Option<NaiveDateTime>,

    #[validate(
        length(min = 1, max = 50, message = "Status must be between 1 and 50 characters"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "PENDING")]
    pub status: String,

    #[validate]
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// Order with its lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub order_date: NaiveDateTime,
    pub status: String,
    pub order_items: Vec<OrderItem>,
}

impl OrderResponse {
    pub fn new(order: Order, order_items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            order_date: order.order_date,
            status: order.status,
            order_items,
        }
    }
}

/// Request DTO for creating or replacing a single order line
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    pub order_id: i64,

    pub product_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}
