// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{
    error::AuthError,
    password::PasswordService,
    repository::CredentialStore,
    token::{IssuedToken, TokenService},
};

/// Exchanges a username and password for a signed token
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            credentials,
            passwords,
            tokens,
        }
    }

    /// Authenticate and issue a token carrying the user's current roles
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let credential = match self.credentials.find_by_username(username).await? {
            Some(credential) => credential,
            None => {
                debug!("Login rejected: unknown username");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .passwords
            .verify_password(password, &credential.password_hash)?
        {
            debug!("Login rejected: password mismatch for user_id={}", credential.id);
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(&credential.username, credential.roles)?;
        info!("User {} logged in", issued.subject);
        Ok(issued)
    }
}
