//! Zone REST API Routes
//!
//! Nursery sub-areas are reference data: seeded out of band, read-only
//! through the API.

use axum::{extract::State, response::IntoResponse, Json};

use sapling_core::Zone;

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::ListResponse;

/// GET /api/v1/zones - List nursery zones
#[utoipa::path(
    get,
    path = "/api/v1/zones",
    tag = "Zones",
    responses(
        (status = 200, description = "All nursery zones", body = ListResponse<Zone>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_zones(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let zones = db.zone_list().await?;
    Ok(Json(ListResponse::new(zones)))
}

/// Create the zone routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_zones))
        .with_state(db)
}
