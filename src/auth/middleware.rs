// Authorization gate for protected routes

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Who may reach an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No token required
    Public,
    /// Any valid token
    Authenticated,
    /// A valid token holding at least one of the listed roles
    AnyOf(&'static [Role]),
}

impl AccessPolicy {
    pub const ADMIN_ONLY: AccessPolicy = AccessPolicy::AnyOf(&[Role::Admin]);
    pub const STAFF: AccessPolicy = AccessPolicy::AnyOf(&[Role::Admin, Role::Seller, Role::Support]);
    pub const BACK_OFFICE: AccessPolicy = AccessPolicy::AnyOf(&[Role::Admin, Role::Support]);

    /// Role check only; the caller has already established identity
    pub fn permits(&self, roles: &BTreeSet<Role>) -> bool {
        match self {
            AccessPolicy::Public | AccessPolicy::Authenticated => true,
            AccessPolicy::AnyOf(allowed) => allowed.iter().any(|role| roles.contains(role)),
        }
    }
}

/// Identity of the caller, attached to the request by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let token = value?.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Decide whether a request may proceed
///
/// Returns `Ok(None)` for public endpoints, the caller's identity when a
/// protected endpoint admits it, `Unauthenticated` when no valid token is
/// presented and `Forbidden` when the token is valid but lacks every
/// accepted role.
pub fn authorize(
    policy: AccessPolicy,
    authorization: Option<&HeaderValue>,
    tokens: &TokenService,
    now: DateTime<Utc>,
) -> Result<Option<AuthenticatedUser>, AuthError> {
    if policy == AccessPolicy::Public {
        return Ok(None);
    }

    let token = bearer_token(authorization).ok_or(AuthError::Unauthenticated)?;
    let verified = tokens.verify_at(token, now).map_err(|e| {
        warn!("Token rejected: {}", e);
        AuthError::Unauthenticated
    })?;

    if !policy.permits(&verified.roles) {
        return Err(AuthError::Forbidden);
    }

    Ok(Some(AuthenticatedUser {
        username: verified.subject,
        roles: verified.roles,
    }))
}

/// Token service plus the policy of the routes it guards
#[derive(Clone)]
pub struct Gate {
    tokens: Arc<TokenService>,
    policy: AccessPolicy,
}

impl Gate {
    pub fn new(tokens: Arc<TokenService>, policy: AccessPolicy) -> Self {
        Self { tokens, policy }
    }
}

/// Middleware applying a [`Gate`] to every request of a route
pub async fn enforce(
    State(gate): State<Gate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();
    let outcome = authorize(
        gate.policy,
        request.headers().get(header::AUTHORIZATION),
        &gate.tokens,
        Utc::now(),
    );

    match outcome {
        Ok(Some(user)) => {
            debug!(
                "Authorization successful: user={}, roles={:?}, endpoint={}",
                user.username, user.roles, endpoint
            );
            request.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(err) => {
            warn!("Authorization failed: {}, endpoint={}", err, endpoint);
            return Err(err);
        }
    }

    Ok(next.run(request).await)
}

/// Put a method router behind a gate
pub fn guarded<S>(route: MethodRouter<S>, gate: Gate) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(gate, enforce))
}
