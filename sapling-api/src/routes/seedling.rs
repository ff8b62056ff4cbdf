//! Seedling REST API Routes
//!
//! The only entity with the full create/edit/delete cycle; everything
//! else in the nursery is append-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use sapling_core::{RecordId, Seedling};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{CreateSeedlingRequest, ListResponse, UpdateSeedlingRequest};

/// GET /api/v1/seedlings - List all seedling stock lines
#[utoipa::path(
    get,
    path = "/api/v1/seedlings",
    tag = "Seedlings",
    responses(
        (status = 200, description = "All seedling stock lines", body = ListResponse<Seedling>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_seedlings(State(db): State<DbClient>) -> ApiResult<impl IntoResponse> {
    let seedlings = db.seedling_list().await?;
    Ok(Json(ListResponse::new(seedlings)))
}

/// POST /api/v1/seedlings - Add a stock line
#[utoipa::path(
    post,
    path = "/api/v1/seedlings",
    tag = "Seedlings",
    request_body = CreateSeedlingRequest,
    responses(
        (status = 201, description = "Seedling created", body = Seedling),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_seedling(
    State(db): State<DbClient>,
    Json(req): Json<CreateSeedlingRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.species.trim().is_empty() {
        return Err(ApiError::missing_field("species"));
    }
    if req.height_range.trim().is_empty() {
        return Err(ApiError::missing_field("height_range"));
    }
    if req.count < 0 {
        return Err(ApiError::invalid_range("count", ">= 0"));
    }

    let seedling = db.seedling_create(&req).await?;
    Ok((StatusCode::CREATED, Json(seedling)))
}

/// GET /api/v1/seedlings/{id} - Get one stock line
#[utoipa::path(
    get,
    path = "/api/v1/seedlings/{id}",
    tag = "Seedlings",
    params(("id" = i64, Path, description = "Seedling ID")),
    responses(
        (status = 200, description = "Seedling details", body = Seedling),
        (status = 404, description = "Seedling not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_seedling(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<impl IntoResponse> {
    let seedling = db
        .seedling_get(id)
        .await?
        .ok_or_else(|| ApiError::seedling_not_found(id))?;
    Ok(Json(seedling))
}

/// PATCH /api/v1/seedlings/{id} - Edit a stock line
#[utoipa::path(
    patch,
    path = "/api/v1/seedlings/{id}",
    tag = "Seedlings",
    params(("id" = i64, Path, description = "Seedling ID")),
    request_body = UpdateSeedlingRequest,
    responses(
        (status = 200, description = "Seedling updated", body = Seedling),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Seedling not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_seedling(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
    Json(req): Json<UpdateSeedlingRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.is_empty() {
        return Err(ApiError::invalid_input(
            "At least one field must be provided for update",
        ));
    }
    if let Some(ref species) = req.species {
        if species.trim().is_empty() {
            return Err(ApiError::invalid_input("species cannot be empty"));
        }
    }
    if let Some(ref height_range) = req.height_range {
        if height_range.trim().is_empty() {
            return Err(ApiError::invalid_input("height_range cannot be empty"));
        }
    }
    if let Some(count) = req.count {
        if count < 0 {
            return Err(ApiError::invalid_range("count", ">= 0"));
        }
    }

    let seedling = db
        .seedling_update(id, &req)
        .await?
        .ok_or_else(|| ApiError::seedling_not_found(id))?;
    Ok(Json(seedling))
}

/// DELETE /api/v1/seedlings/{id} - Remove a stock line
#[utoipa::path(
    delete,
    path = "/api/v1/seedlings/{id}",
    tag = "Seedlings",
    params(("id" = i64, Path, description = "Seedling ID")),
    responses(
        (status = 204, description = "Seedling deleted"),
        (status = 404, description = "Seedling not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_seedling(
    State(db): State<DbClient>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    if !db.seedling_delete(id).await? {
        return Err(ApiError::seedling_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Create the seedling routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(list_seedlings))
        .route("/", axum::routing::post(create_seedling))
        .route("/:id", axum::routing::get(get_seedling))
        .route("/:id", axum::routing::patch(update_seedling))
        .route("/:id", axum::routing::delete(delete_seedling))
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation_shape() {
        let req = CreateSeedlingRequest {
            species: "  ".to_string(),
            height_range: "10-15".to_string(),
            count: 5,
            survived_count: None,
            dead_count: None,
            batch_id: None,
            zone_id: None,
        };
        assert!(req.species.trim().is_empty());
        assert!(!req.height_range.trim().is_empty());
    }

    #[test]
    fn test_update_request_empty_patch_detected() {
        assert!(UpdateSeedlingRequest::default().is_empty());
    }
}
