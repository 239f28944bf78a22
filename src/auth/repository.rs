// Credential lookup for login

use axum::async_trait;
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{Credential, CredentialRow},
};

/// User row joined with its role names, aggregated into a TEXT[]
///
/// Callers append a WHERE clause and `GROUP BY u.id`.
pub(crate) const CREDENTIAL_SELECT: &str = "SELECT u.id, u.username, u.password_hash, u.email, \
     COALESCE(ARRAY_AGG(r.role ORDER BY r.role) FILTER (WHERE r.role IS NOT NULL), ARRAY[]::TEXT[]) AS roles \
     FROM users u LEFT JOIN user_roles r ON r.user_id = u.id";

/// Source of stored credentials, keyed by exact username
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError>;
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError> {
        let query = format!("{} WHERE u.username = $1 GROUP BY u.id", CREDENTIAL_SELECT);

        let row = sqlx::query_as::<_, CredentialRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Credential::from))
    }
}
