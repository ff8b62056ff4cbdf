//! Fulfillment Request REST API Routes
//!
//! The workflow endpoints delegate to the fulfillment service; the
//! handlers here only translate HTTP in and out.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use sapling_core::{RecordId, SeedlingRequest};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::services;
use crate::types::{
    ApproveOutcome, CreateFulfillmentRequest, DeliveryNoteResponse, ListResponse, RequestDetail,
};

/// GET /api/v1/requests - List fulfillment requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    tag = "Requests",
    responses(
        (status = 200, description = "All fulfillment requests", body = ListResponse<SeedlingRequest>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_requests(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let requests = db.request_list().await?;
    Ok(Json(ListResponse::new(requests)))
}

/// POST /api/v1/requests - Create a fulfillment request with line items
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    tag = "Requests",
    request_body = CreateFulfillmentRequest,
    responses(
        (status = 201, description = "Request created with status pending", body = RequestDetail),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Partner or seedling not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_request(
    State(db): State<DbClient>,
    Json(req): Json<CreateFulfillmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let detail = services::create_request(&db, &req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/requests/{id} - Get a request with its items
#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    tag = "Requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request with items", body = RequestDetail),
        (status = 404, description = "Request not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_request(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let request = db
        .request_get(id)
        .await?
        .ok_or_else(|| ApiError::request_not_found(id))?;
    let items = db.request_items(id).await?;
    Ok(Json(RequestDetail { request, items }))
}

/// POST /api/v1/requests/{id}/approve - Approve and decrement stock
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/approve",
    tag = "Requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request approved; skipped items listed", body = ApproveOutcome),
        (status = 404, description = "Request not found", body = ApiError),
        (status = 409, description = "Request is not pending", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_request(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let outcome = services::approve_request(&db, id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/requests/{id}/delivery-note - Printable delivery document
#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}/delivery-note",
    tag = "Requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Delivery note with rendered text", body = DeliveryNoteResponse),
        (status = 404, description = "Request not found", body = ApiError),
        (status = 409, description = "Request is not approved", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delivery_note(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let note = services::delivery_note(&db, id).await?;
    let rendered = note.render();
    Ok(Json(DeliveryNoteResponse { note, rendered }))
}

/// GET /api/v1/requests/{id}/delivery-note.txt - Plain-text variant
/// for direct printing.
pub async fn delivery_note_text(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let note = services::delivery_note(&db, id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        note.render(),
    ))
}

/// DELETE /api/v1/requests/{id} - Delete a request and its items
#[utoipa::path(
    delete,
    path = "/api/v1/requests/{id}",
    tag = "Requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request and items deleted"),
        (status = 404, description = "Request not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_request(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    if !db.request_delete(id).await? {
        return Err(ApiError::request_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Create the fulfillment request routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_requests))
        .route("/", axum::routing::post(create_request))
        .route("/:id", axum::routing::get(get_request))
        .route("/:id", axum::routing::delete(delete_request))
        .route("/:id/approve", axum::routing::post(approve_request))
        .route("/:id/delivery-note", axum::routing::get(delivery_note))
        .route(
            "/:id/delivery-note.txt",
            axum::routing::get(delivery_note_text),
        )
        .with_state(db)
}
