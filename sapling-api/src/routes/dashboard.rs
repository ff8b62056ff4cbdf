//! Dashboard REST API Routes
//!
//! Read-side only: fetch the full seedling and batch collections and
//! recompute every statistic from scratch. No persisted rollups.

use axum::{extract::State, response::IntoResponse, Json};

use sapling_core::{stats, DashboardSummary};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};

/// GET /api/v1/dashboard - Summary statistics
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Derived nursery statistics", body = DashboardSummary),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let seedlings = db.seedling_list().await?;
    let batches = db.batch_list().await?;
    Ok(Json(stats::summarize(&seedlings, &batches)))
}

/// Create the dashboard routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(get_dashboard))
        .with_state(db)
}
