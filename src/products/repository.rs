use sqlx::PgPool;

use crate::db::ensure_exists;
use crate::error::ApiError;
use crate::products::{Product, ProductRequest};

/// Repository for products
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new ProductRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product, checking its category inside the same transaction
    pub async fn create(&self, request: &ProductRequest) -> Result<Product, ApiError> {
        let mut tx = self.pool.begin().await?;

        if let Some(category_id) = request.category_id {
            ensure_exists(&mut *tx, "categories", "Category", category_id).await?;
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, category_id
            "#,
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(&request.description)
        .bind(request.category_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(product)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, ApiError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description, category_id FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, ApiError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description, category_id FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Replace every field of a product; `None` when it does not exist
    pub async fn update(
        &self,
        id: i64,
        request: &ProductRequest,
    ) -> Result<Option<Product>, ApiError> {
        let mut tx = self.pool.begin().await?;

        if let Some(category_id) = request.category_id {
            ensure_exists(&mut *tx, "categories", "Category", category_id).await?;
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1,
                price = $2,
                description = $3,
                category_id = $4
            WHERE id = $5
            RETURNING id, name, price, description, category_id
            "#,
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(&request.description)
        .bind(request.category_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(product)
    }

    /// Fails with a constraint violation while order lines still reference the product
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
