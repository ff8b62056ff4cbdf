//! Axum Middleware for Authentication
//!
//! Validates the `Authorization: Bearer` header on every protected
//! route, injects `AuthContext` into request extensions on success and
//! returns 401 otherwise. Pages in the original enforced this purely
//! client-side; here the boundary is real.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_token, AuthConfig, AuthContext};
use crate::error::ApiError;

/// Shared state for the authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthMiddlewareState {
    pub auth_config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self {
            auth_config: Arc::new(auth_config),
        }
    }
}

/// Axum middleware validating bearer tokens.
///
/// 1. Extracts the `Authorization: Bearer <token>` header
/// 2. Validates the token signature and expiry
/// 3. Injects `AuthContext` into request extensions
/// 4. Returns 401 for missing or invalid credentials
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization: Bearer header"))?;

    let claims = validate_token(&state.auth_config, token)?;
    request.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(request).await)
}

/// Extractor pulling the `AuthContext` the middleware injected.
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Missing authentication context"))
    }
}
