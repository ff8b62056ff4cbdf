//! REST API Routes Module
//!
//! All route handlers organized by entity, plus the router assembly:
//! - Entity CRUD routes under /api/v1/* (bearer-token protected)
//! - Fulfillment request workflow (create, approve, delivery note)
//! - Dashboard statistics and CSV export
//! - Health check endpoints (no auth)
//! - CORS support for the browser dashboard

pub mod auth;
pub mod batch;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod log;
pub mod partner;
pub mod request;
pub mod seedling;
pub mod status;
pub mod zone;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::openapi::ApiDoc;

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Check if running in a production environment.
fn is_production_environment() -> bool {
    std::env::var("SAPLING_ENVIRONMENT")
        .map(|e| matches!(e.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

/// Validate API configuration for production use.
fn validate_api_config_for_production(config: &ApiConfig) -> ApiResult<()> {
    if config.cors_origins.is_empty() {
        return Err(ApiError::invalid_input(
            "CORS origins not configured for production. Set SAPLING_CORS_ORIGINS.",
        ));
    }
    Ok(())
}

/// Build the entity routes that sit behind the auth middleware.
fn build_protected_routes(db: &DbClient) -> Router {
    Router::new()
        .nest("/seedlings", seedling::create_router(db.clone()))
        .nest("/batches", batch::create_router(db.clone()))
        .nest("/partners", partner::create_router(db.clone()))
        .nest("/logs", log::create_router(db.clone()))
        .nest("/zones", zone::create_router(db.clone()))
        .nest("/requests", request::create_router(db.clone()))
        .nest("/status", status::create_router(db.clone()))
        .nest("/dashboard", dashboard::create_router(db.clone()))
        .nest("/export", export::create_router(db.clone()))
        .route("/auth/me", get(auth::me))
}

/// Build the CORS layer from ApiConfig.
///
/// With no configured origins (development) every origin is allowed;
/// otherwise only the configured list.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any).expose_headers(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

/// Create the complete API router.
///
/// - All entity routes under /api/v1/* require a bearer token
/// - /api/v1/auth/login and /health/* are public
/// - OpenAPI spec at /openapi.json, Swagger UI at /swagger-ui (with
///   the swagger-ui feature)
///
/// In production (SAPLING_ENVIRONMENT=production), refuses to start
/// with the placeholder JWT secret or without configured CORS origins.
pub fn create_api_router(
    db: DbClient,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> ApiResult<Router> {
    if is_production_environment() {
        auth_config.validate_for_production()?;
        validate_api_config_for_production(api_config)?;
    }

    let auth_state = AuthMiddlewareState::new(auth_config);
    let shared_auth = auth_state.auth_config.clone();

    let protected = build_protected_routes(&db)
        .layer(from_fn_with_state(auth_state, auth_middleware));

    let api_routes = Router::new()
        .merge(protected)
        .merge(auth::create_router(shared_auth));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health::create_router(db))
        .route("/openapi.json", get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()));
    }

    let cors = build_cors_layer(api_config);

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Create an API router without authentication middleware.
///
/// Testing and local development only; production deployments use
/// `create_api_router`.
#[cfg(any(test, feature = "dev"))]
pub fn create_api_router_unauthenticated(
    db: DbClient,
    api_config: &ApiConfig,
) -> ApiResult<Router> {
    let router = Router::new()
        .nest("/api/v1", build_protected_routes(&db))
        .nest("/health", health::create_router(db))
        .route("/openapi.json", get(openapi_json));

    let cors = build_cors_layer(api_config);

    Ok(router.layer(TraceLayer::new_for_http()).layer(cors))
}
