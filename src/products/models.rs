use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_non_negative_price, validate_not_blank};

/// Catalogue product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    #[schema(example = "The Rust Programming Language")]
    pub name: String,
    #[schema(value_type = String, example = "39.99")]
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

/// Request DTO for creating or replacing a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"),
        custom = "validate_not_blank"
    )]
    pub name: String,

    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "39.99")]
    pub price: Decimal,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub category_id: Option<i64>,
}
