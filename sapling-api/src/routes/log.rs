//! Logbook REST API Routes
//!
//! Daily activity entries, append-only, newest first.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use sapling_core::NurseryLog;

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{CreateLogRequest, ListResponse};

/// GET /api/v1/logs - List logbook entries, newest first
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    tag = "Logbook",
    responses(
        (status = 200, description = "All logbook entries", body = ListResponse<NurseryLog>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let logs = db.log_list().await?;
    Ok(Json(ListResponse::new(logs)))
}

/// POST /api/v1/logs - Record an activity
#[utoipa::path(
    post,
    path = "/api/v1/logs",
    tag = "Logbook",
    request_body = CreateLogRequest,
    responses(
        (status = 201, description = "Log entry recorded", body = NurseryLog),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_log(
    State(db): State<DbClient>,
    Json(req): Json<CreateLogRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.activity.trim().is_empty() {
        return Err(ApiError::missing_field("activity"));
    }

    let log = db.log_create(&req).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// Create the logbook routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_logs))
        .route("/", axum::routing::post(create_log))
        .with_state(db)
}
