//! CSV Export REST API Routes
//!
//! One downloadable file per entity collection. Serialization lives in
//! `sapling_core::export`; this module only maps the entity name to
//! the right fetch and sets the download headers.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use sapling_core::{export_csv, export_filename};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};

fn to_rows<T: serde::Serialize>(items: &[T]) -> ApiResult<Vec<serde_json::Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(ApiError::from))
        .collect()
}

/// GET /api/v1/export/{entity} - Download an entity collection as CSV
///
/// `entity` is one of `seedlings`, `batches`, `partners`, `logs`,
/// `zones`, `requests`.
#[utoipa::path(
    get,
    path = "/api/v1/export/{entity}",
    tag = "Export",
    params(("entity" = String, Path, description = "Entity collection to export")),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 400, description = "Unknown entity or empty collection", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_entity(
    State(db): State<DbClient>,
    Path(entity): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let rows = match entity.as_str() {
        "seedlings" => to_rows(&db.seedling_list().await?)?,
        "batches" => to_rows(&db.batch_list().await?)?,
        "partners" => to_rows(&db.partner_list().await?)?,
        "logs" => to_rows(&db.log_list().await?)?,
        "zones" => to_rows(&db.zone_list().await?)?,
        "requests" => to_rows(&db.request_list().await?)?,
        other => {
            return Err(ApiError::invalid_input(format!(
                "Unknown export entity '{}'",
                other
            )))
        }
    };

    let csv = export_csv(&rows)?;
    let filename = export_filename(&entity, chrono::Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}

/// Create the export routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    axum::Router::new()
        .route("/:entity", axum::routing::get(export_entity))
        .with_state(db)
}
