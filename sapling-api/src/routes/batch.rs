//! Batch REST API Routes
//!
//! Collection events are append-only: once recorded, provenance never
//! changes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use sapling_core::{Batch, RecordId};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{CreateBatchRequest, ListResponse};

/// GET /api/v1/batches - List collection events, newest first
#[utoipa::path(
    get,
    path = "/api/v1/batches",
    tag = "Batches",
    responses(
        (status = 200, description = "All collection batches", body = ListResponse<Batch>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_batches(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let batches = db.batch_list().await?;
    Ok(Json(ListResponse::new(batches)))
}

/// POST /api/v1/batches - Record a collection event
#[utoipa::path(
    post,
    path = "/api/v1/batches",
    tag = "Batches",
    request_body = CreateBatchRequest,
    responses(
        (status = 201, description = "Batch recorded", body = Batch),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_batch(
    State(db): State<DbClient>,
    Json(req): Json<CreateBatchRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.batch_code.trim().is_empty() {
        return Err(ApiError::missing_field("batch_code"));
    }
    if let Some(lat) = req.gps_latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::invalid_range("gps_latitude", "between -90 and 90"));
        }
    }
    if let Some(lng) = req.gps_longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::invalid_range(
                "gps_longitude",
                "between -180 and 180",
            ));
        }
    }

    let batch = db.batch_create(&req).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// GET /api/v1/batches/{id} - Get one collection event
#[utoipa::path(
    get,
    path = "/api/v1/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "Batch ID")),
    responses(
        (status = 200, description = "Batch details", body = Batch),
        (status = 404, description = "Batch not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_batch(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let batch = db
        .batch_get(id)
        .await?
        .ok_or_else(|| ApiError::batch_not_found(id))?;
    Ok(Json(batch))
}

/// Create the batch routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_batches))
        .route("/", axum::routing::post(create_batch))
        .route("/:id", axum::routing::get(get_batch))
        .with_state(db)
}
