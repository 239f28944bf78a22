// Authentication data models and DTOs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Coarse permission tag carried by users and embedded in tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Seller,
    Support,
    Customer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Seller, Role::Support, Role::Customer];

    /// Name used in the database and in token claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
            Role::Support => "SUPPORT",
            Role::Customer => "CUSTOMER",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "SELLER" => Ok(Role::Seller),
            "SUPPORT" => Ok(Role::Support),
            "CUSTOMER" => Ok(Role::Customer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse role names, dropping anything outside the enumeration
pub fn parse_roles<I, S>(names: I) -> BTreeSet<Role>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| match name.as_ref().parse::<Role>() {
            Ok(role) => Some(role),
            Err(reason) => {
                tracing::debug!("Ignoring role: {}", reason);
                None
            }
        })
        .collect()
}

/// Row shape of a user joined with its aggregated roles
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Persisted user credential
///
/// The password hash never leaves the service layer: this type is not
/// serializable and its Debug output redacts the hash.
#[derive(Clone)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish()
    }
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            roles: parse_roles(&row.roles),
        }
    }
}

/// Login request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Str0ng!Passw0rd")]
    pub password: String,
}

/// Login response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_role_parsing_is_case_sensitive() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Seller".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_roles_drops_unknown_names() {
        let roles = parse_roles(["SELLER", "SUPERUSER", "ADMIN", "SELLER"]);
        assert_eq!(roles, BTreeSet::from([Role::Admin, Role::Seller]));
    }

    #[test]
    fn test_credential_debug_redacts_hash() {
        let credential = Credential {
            id: 1,
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            email: "alice@example.com".to_string(),
            roles: BTreeSet::from([Role::Admin]),
        };
        let debug = format!("{:?}", credential);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("argon2id"));
    }
}
