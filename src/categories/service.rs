use validator::Validate;

use crate::categories::{Category, CategoryRepository, CategoryRequest};
use crate::error::ApiError;

/// Service layer for categories
#[derive(Clone)]
pub struct CategoryService {
    repository: CategoryRepository,
}

impl CategoryService {
    /// Create a new CategoryService
    pub fn new(repository: CategoryRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CategoryRequest) -> Result<Category, ApiError> {
        request.validate()?;

        let category = self.repository.create(&request.name).await?;
        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category", id))
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.repository.find_all().await
    }

    pub async fn update(&self, id: i64, request: CategoryRequest) -> Result<Category, ApiError> {
        request.validate()?;

        let category = self
            .repository
            .update(id, &request.name)
            .await?
            .ok_or_else(|| ApiError::not_found("Category", id))?;

        tracing::info!("Updated category {}", id);
        Ok(category)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.repository.delete(id).await? {
            return Err(ApiError::not_found("Category", id));
        }

        tracing::info!("Deleted category {}", id);
        Ok(())
    }
}
