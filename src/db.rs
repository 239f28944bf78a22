use sqlx::postgres::{PgExecutor, PgPool, PgPoolOptions};
use std::time::Duration;
use crate::error::ApiError;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Fail with `NotFound` unless a row with `id` exists in `table`
///
/// Works on the pool or inside a transaction (`&mut *tx`).
///
/// # Example
/// ```ignore
/// ensure_exists(&mut *tx, "users", "User", request.user_id).await?;
/// ```
pub async fn ensure_exists<'e, E>(
    executor: E,
    table: &'static str,
    resource: &str,
    id: i64,
) -> Result<(), ApiError>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
    let exists: Option<bool> = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_one(executor)
        .await?;

    if exists.unwrap_or(false) {
        Ok(())
    } else {
        tracing::debug!("{} with id {} does not exist", resource, id);
        Err(ApiError::not_found(resource, id))
    }
}

/// Map unique and foreign-key violations to `Conflict`, anything else to a database error
///
/// # Example
/// ```ignore
/// .await
/// .map_err(|e| conflict_on_constraint(e, "Username 'alice' is already taken"))?;
/// ```
pub fn conflict_on_constraint(error: sqlx::Error, message: impl Into<String>) -> ApiError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            return ApiError::Conflict {
                message: message.into(),
            };
        }
    }
    ApiError::DatabaseError(error)
}
