//! Project Status REST API Routes
//!
//! The lifecycle stage is a single-row contract (id = 1). A missing
//! row means the store was never seeded and surfaces as a 500, never
//! as a default stage.

use axum::{extract::State, response::IntoResponse, Json};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{ProjectStatusResponse, UpdateStageRequest};

/// GET /api/v1/status - Current stage plus the ordered timeline
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Project Status",
    responses(
        (status = 200, description = "Current project stage", body = ProjectStatusResponse),
        (status = 500, description = "Status row missing", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_status(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let status = db.project_status_get().await?;
    Ok(Json(ProjectStatusResponse::new(status.current_stage)))
}

/// PUT /api/v1/status - Move the project to another stage
#[utoipa::path(
    put,
    path = "/api/v1/status",
    tag = "Project Status",
    request_body = UpdateStageRequest,
    responses(
        (status = 200, description = "Stage updated", body = ProjectStatusResponse),
        (status = 500, description = "Status row missing", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(db): State<DbClient>,
    Json(req): Json<UpdateStageRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = db.project_status_update(req.current_stage).await?;
    tracing::info!(stage = %status.current_stage, "Project stage updated");
    Ok(Json(ProjectStatusResponse::new(status.current_stage)))
}

/// Create the project status routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route(
            "/",
            axum::routing::get(get_status).put(update_status),
        )
        .with_state(db)
}
