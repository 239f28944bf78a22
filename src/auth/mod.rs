// Authentication module
// Password login issuing HS256 tokens, and the role gate protecting routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::login_handler;
pub use middleware::{authorize, guarded, AccessPolicy, AuthenticatedUser, Gate};
pub use models::{LoginRequest, LoginResponse, Role};
pub use password::PasswordService;
pub use repository::{CredentialStore, PgCredentialStore};
pub use service::AuthService;
pub use token::TokenService;
