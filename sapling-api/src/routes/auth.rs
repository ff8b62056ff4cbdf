//! Authentication REST API Routes
//!
//! - POST /api/v1/auth/login - exchange credentials for a bearer token
//! - GET  /api/v1/auth/me    - identity behind the current token
//!
//! Login is the only route in the service exempt from the auth
//! middleware besides health checks.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::auth::{generate_token, AuthConfig, AuthContext};
use crate::error::{ApiError, ApiResult};
use crate::types::{LoginRequest, LoginResponse};

/// POST /api/v1/auth/login - Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; token returned", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiError),
    ),
)]
pub async fn login(
    State(config): State<Arc<AuthConfig>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if !config.verify_credentials(&req.email, &req.password) {
        tracing::warn!(email = %req.email, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = generate_token(&config, &req.email)?;
    tracing::info!(email = %req.email, "Signed in");
    Ok(Json(LoginResponse {
        token,
        expires_in: config.token_ttl_secs,
    }))
}

/// GET /api/v1/auth/me - Identity behind the presented token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated identity", body = AuthContext),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(ctx: AuthContext) -> ApiResult<impl IntoResponse> {
    Ok(Json(ctx))
}

/// Create the login router. Mounted outside the auth middleware so
/// unauthenticated clients can sign in. The /me route is registered
/// separately behind the middleware, which injects the `AuthContext`
/// its handler reads.
pub fn create_router(config: Arc<AuthConfig>) -> axum::Router {
    axum::Router::new()
        .route("/auth/login", axum::routing::post(login))
        .with_state(config)
}
