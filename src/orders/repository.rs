use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::db::ensure_exists;
use crate::error::ApiError;
use crate::orders::{Order, OrderItem, OrderItemRequest, OrderLine, OrderResponse};

/// Repository for order operations
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    /// Create a new OrdersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order with its lines in a transaction
    pub async fn create(
        &self,
        user_id: i64,
        order_date: NaiveDateTime,
        status: &str,
        lines: &[OrderLine],
    ) -> Result<OrderResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "users", "User", user_id).await?;

        // Insert order
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, order_date, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, order_date, status
            "#,
        )
        .bind(user_id)
        .bind(order_date)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        // Insert order items
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            ensure_exists(&mut *tx, "products", "Product", line.product_id).await?;
            let item =
                insert_item(&mut tx, order.id, line.product_id, line.quantity, line.price).await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(OrderResponse::new(order, items))
    }

    /// Find an order with its lines
    pub async fn find_by_id(&self, id: i64) -> Result<Option<OrderResponse>, ApiError> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, order_date, status FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(OrderResponse::new(order, items)))
    }

    /// All orders with their lines, ordered by ID
    pub async fn find_all(&self) -> Result<Vec<OrderResponse>, ApiError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, order_date, status FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price FROM order_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_items(orders, items))
    }

    /// Update the order header; `None` when the order does not exist
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        order_date: Option<NaiveDateTime>,
        status: &str,
    ) -> Result<Option<OrderResponse>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET user_id = $1,
                order_date = COALESCE($2, order_date),
                status = $3
            WHERE id = $4
            RETURNING id, user_id, order_date, status
            "#,
        )
        .bind(user_id)
        .bind(order_date)
        .bind(status)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;

        let order = match order {
            Ok(Some(order)) => order,
            Ok(None) => return Ok(None),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(ApiError::not_found("User", user_id));
            }
            Err(e) => return Err(e.into()),
        };

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(OrderResponse::new(order, items)))
    }

    /// Delete an order; its lines go with it
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for order items operations
#[derive(Clone)]
pub struct OrderItemsRepository {
    pool: PgPool,
}

impl OrderItemsRepository {
    /// Create a new OrderItemsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a line into an existing order
    pub async fn create(&self, request: &OrderItemRequest) -> Result<OrderItem, ApiError> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "orders", "Order", request.order_id).await?;
        ensure_exists(&mut *tx, "products", "Product", request.product_id).await?;

        let item = insert_item(
            &mut tx,
            request.order_id,
            request.product_id,
            request.quantity,
            request.price,
        )
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<OrderItem>, ApiError> {
        let item = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn find_all(&self) -> Result<Vec<OrderItem>, ApiError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price FROM order_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Replace every field of a line; `None` when it does not exist
    pub async fn update(
        &self,
        id: i64,
        request: &OrderItemRequest,
    ) -> Result<Option<OrderItem>, ApiError> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "orders", "Order", request.order_id).await?;
        ensure_exists(&mut *tx, "products", "Product", request.product_id).await?;

        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            UPDATE order_items
            SET order_id = $1,
                product_id = $2,
                quantity = $3,
                price = $4
            WHERE id = $5
            RETURNING id, order_id, product_id, quantity, price
            "#,
        )
        .bind(request.order_id)
        .bind(request.product_id)
        .bind(request.quantity)
        .bind(request.price)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_item(
    conn: &mut PgConnection,
    order_id: i64,
    product_id: i64,
    quantity: i32,
    price: Decimal,
) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as::<_, OrderItem>(
        r#"
        INSERT INTO order_items (order_id, product_id, quantity, price)
        VALUES ($1, $2, $3, $4)
        RETURNING id, order_id, product_id, quantity, price
        "#,
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(price)
    .fetch_one(conn)
    .await
}

/// Group lines under their orders, keeping both in ID order
fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderResponse> {
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let lines = by_order.remove(&order.id).unwrap_or_default();
            OrderResponse::new(order, lines)
        })
        .collect()
}
