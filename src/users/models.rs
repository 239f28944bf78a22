use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::models::{Credential, Role};
use crate::validation::{validate_not_blank, validate_password_strength};

/// User as returned by the API; the password hash is never exposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<Credential> for UserResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username,
            email: credential.email,
            roles: credential.roles.into_iter().collect(),
        }
    }
}

/// Request DTO for registering a user
#[derive(Deserialize, Validate, ToSchema)]
pub struct UserRegistration {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    #[schema(example = "alice")]
    pub username: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom = "validate_password_strength"
    )]
    #[schema(example = "Str0ng!Passw0rd")]
    pub password: String,

    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "At least one role is required"))]
    pub roles: Vec<Role>,
}

impl fmt::Debug for UserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish()
    }
}

/// Request DTO for a partial user update
///
/// Absent fields keep their value; `roles`, when present, replaces the role set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_user_update"))]
pub struct UserUpdate {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        custom = "validate_not_blank"
    )]
    pub username: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Roles must not be empty when provided"))]
    pub roles: Option<Vec<Role>>,
}

/// At least one field must carry a value
fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationError> {
    let has_text = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

    if has_text(&update.username) || has_text(&update.email) || update.roles.is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("empty_update");
        error.message = Some("At least one field must be provided".into());
        Err(error)
    }
}
