//! Sapling API - REST API Layer
//!
//! Axum REST service over the nursery PostgreSQL store. Handlers fetch
//! rows through `DbClient`, domain computation lives in sapling-core,
//! and the fulfillment workflow (create / approve / delivery note) is
//! in `services`.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use auth::{generate_token, validate_token, AuthConfig, AuthContext, Claims, JwtSecret};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthMiddlewareState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::FulfillmentStore;
pub use types::*;
