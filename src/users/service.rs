use std::collections::BTreeSet;

use validator::Validate;

use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::users::{UserRegistration, UserRepository, UserResponse, UserUpdate};

/// Service layer for user management
#[derive(Clone)]
pub struct UserService {
    repository: UserRepository,
    passwords: PasswordService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repository: UserRepository, passwords: PasswordService) -> Self {
        Self {
            repository,
            passwords,
        }
    }

    /// Register a user
    ///
    /// The password is hashed before anything reaches the database; duplicate
    /// usernames surface as `Conflict`.
    pub async fn register(&self, request: UserRegistration) -> Result<UserResponse, ApiError> {
        request.validate()?;

        let password_hash = self.passwords.hash_password(&request.password)?;
        let roles: BTreeSet<_> = request.roles.into_iter().collect();

        let user = self
            .repository
            .create(&request.username, &password_hash, &request.email, &roles)
            .await?;

        tracing::info!("Registered user {} with id {}", user.username, user.id);
        Ok(user.into())
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, ApiError> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Apply a partial update
    pub async fn update(&self, id: i64, request: UserUpdate) -> Result<UserResponse, ApiError> {
        request.validate()?;

        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };
        let username = non_blank(&request.username);
        let email = non_blank(&request.email);
        let roles: Option<BTreeSet<_>> = request.roles.map(|roles| roles.into_iter().collect());

        let user = self
            .repository
            .update(id, username.as_deref(), email.as_deref(), roles.as_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))?;

        tracing::info!("Updated user {}", id);
        Ok(user.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.repository.delete(id).await? {
            return Err(ApiError::not_found("User", id));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
