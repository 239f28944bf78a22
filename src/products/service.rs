use validator::Validate;

use crate::db::conflict_on_constraint;
use crate::error::ApiError;
use crate::products::{Product, ProductRepository, ProductRequest};

/// Service layer for products
#[derive(Clone)]
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    /// Create a new ProductService
    pub fn new(repository: ProductRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: ProductRequest) -> Result<Product, ApiError> {
        request.validate()?;

        let product = self.repository.create(&request).await?;
        tracing::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", id))
    }

    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.repository.find_all().await
    }

    pub async fn update(&self, id: i64, request: ProductRequest) -> Result<Product, ApiError> {
        request.validate()?;

        let product = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", id))?;

        tracing::info!("Updated product {}", id);
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let deleted = self.repository.delete(id).await.map_err(|e| {
            conflict_on_constraint(e, format!("Product {} is referenced by order items", id))
        })?;

        if !deleted {
            return Err(ApiError::not_found("Product", id));
        }

        tracing::info!("Deleted product {}", id);
        Ok(())
    }
}
