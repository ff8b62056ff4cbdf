//! Partner REST API Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use sapling_core::{Partner, RecordId};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{CreatePartnerRequest, ListResponse};

/// GET /api/v1/partners - List recipient organizations, by name
#[utoipa::path(
    get,
    path = "/api/v1/partners",
    tag = "Partners",
    responses(
        (status = 200, description = "All partners", body = ListResponse<Partner>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_partners(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let partners = db.partner_list().await?;
    Ok(Json(ListResponse::new(partners)))
}

/// POST /api/v1/partners - Register a recipient organization
#[utoipa::path(
    post,
    path = "/api/v1/partners",
    tag = "Partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner registered", body = Partner),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_partner(
    State(db): State<DbClient>,
    Json(req): Json<CreatePartnerRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.name.trim().is_empty() {
        return Err(ApiError::missing_field("name"));
    }

    let partner = db.partner_create(&req).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

/// GET /api/v1/partners/{id} - Get one partner
#[utoipa::path(
    get,
    path = "/api/v1/partners/{id}",
    tag = "Partners",
    params(("id" = i64, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner details", body = Partner),
        (status = 404, description = "Partner not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_partner(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let partner = db
        .partner_get(id)
        .await?
        .ok_or_else(|| ApiError::partner_not_found(id))?;
    Ok(Json(partner))
}

/// DELETE /api/v1/partners/{id} - Remove a partner
#[utoipa::path(
    delete,
    path = "/api/v1/partners/{id}",
    tag = "Partners",
    params(("id" = i64, Path, description = "Partner ID")),
    responses(
        (status = 204, description = "Partner deleted"),
        (status = 404, description = "Partner not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_partner(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    if !db.partner_delete(id).await? {
        return Err(ApiError::partner_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Create the partner routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_partners))
        .route("/", axum::routing::post(create_partner))
        .route("/:id", axum::routing::get(get_partner))
        .route("/:id", axum::routing::delete(delete_partner))
        .with_state(db)
}
