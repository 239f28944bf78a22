use std::collections::BTreeSet;

use sqlx::{PgConnection, PgPool};

use crate::auth::models::{Credential, CredentialRow, Role};
use crate::auth::repository::CREDENTIAL_SELECT;
use crate::db::conflict_on_constraint;
use crate::error::ApiError;

/// Repository for users and their role assignments
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user and its roles in one transaction
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
        roles: &BTreeSet<Role>,
    ) -> Result<Credential, ApiError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_constraint(e, format!("Username '{}' is already taken", username)))?;

        insert_roles(&mut tx, id, roles).await?;

        tx.commit().await?;

        Ok(Credential {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            email: email.to_string(),
            roles: roles.clone(),
        })
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, ApiError> {
        let query = format!("{} WHERE u.id = $1 GROUP BY u.id", CREDENTIAL_SELECT);
        let row = sqlx::query_as::<_, CredentialRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Credential::from))
    }

    /// All users ordered by ID
    pub async fn find_all(&self) -> Result<Vec<Credential>, ApiError> {
        let query = format!("{} GROUP BY u.id ORDER BY u.id", CREDENTIAL_SELECT);
        let rows = sqlx::query_as::<_, CredentialRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Credential::from).collect())
    }

    /// Apply a partial update; `None` when the user does not exist
    ///
    /// `roles`, when given, replaces the whole role set.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
        email: Option<&str>,
        roles: Option<&BTreeSet<Role>>,
    ) -> Result<Option<Credential>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                email = COALESCE($2, email)
            WHERE id = $3
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            conflict_on_constraint(
                e,
                format!("Username '{}' is already taken", username.unwrap_or_default()),
            )
        })?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(roles) = roles {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_roles(&mut tx, id, roles).await?;
        }

        let query = format!("{} WHERE u.id = $1 GROUP BY u.id", CREDENTIAL_SELECT);
        let row = sqlx::query_as::<_, CredentialRow>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Credential::from(row)))
    }

    /// Delete a user; returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_roles(
    conn: &mut PgConnection,
    user_id: i64,
    roles: &BTreeSet<Role>,
) -> Result<(), sqlx::Error> {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();

    sqlx::query("INSERT INTO user_roles (user_id, role) SELECT $1, UNNEST($2::TEXT[])")
        .bind(user_id)
        .bind(names)
        .execute(conn)
        .await?;

    Ok(())
}
