// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::ErrorResponse;

/// Authentication and authorization error types
///
/// Every variant is terminal for the request. The first six describe a client
/// problem; the last three are server faults and never leak their details.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password, deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    /// Any token extraction or verification failure seen by a protected endpoint
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid identity without any of the roles the endpoint accepts
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Database(_) | AuthError::PasswordHash | AuthError::TokenGeneration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable code used in the error body
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Database(_) | AuthError::PasswordHash | AuthError::TokenGeneration(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Message that is safe to send to clients (no sensitive data)
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password",
            AuthError::MalformedToken => "Malformed token",
            AuthError::InvalidSignature => "Invalid token signature",
            AuthError::Expired => "Token has expired",
            AuthError::Unauthenticated => "Authentication required",
            AuthError::Forbidden => "Insufficient permissions",
            AuthError::Database(_) | AuthError::PasswordHash | AuthError::TokenGeneration(_) => {
                "Internal server error"
            }
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AuthError::Database(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHash => error!("Password hashing error"),
            AuthError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
            AuthError::Forbidden => warn!("Request rejected: insufficient permissions"),
            _ => warn!("Request rejected: {}", self),
        }

        let body = ErrorResponse::new(self.error_code(), self.client_message());
        (status, Json(body)).into_response()
    }
}
