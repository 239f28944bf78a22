// Process configuration, read once at startup from the environment

use std::fmt;

use chrono::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Signing secret and token lifetime shared by token issuance and verification
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl: Duration) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "secret must not be empty".to_string(),
            });
        }
        if token_ttl <= Duration::zero() {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_SECS",
                reason: "token lifetime must be positive".to_string(),
            });
        }
        Ok(Self { secret, token_ttl })
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let ttl_secs = match lookup("JWT_EXPIRATION_SECS") {
            Some(raw) => raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: "JWT_EXPIRATION_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };
        let token_ttl = Duration::try_seconds(ttl_secs).ok_or(ConfigError::Invalid {
            name: "JWT_EXPIRATION_SECS",
            reason: "out of range".to_string(),
        })?;

        Ok(Self {
            database_url,
            host,
            port,
            auth: AuthConfig::new(secret, token_ttl)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
