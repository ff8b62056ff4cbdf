//! OpenAPI Specification
//!
//! Defines the OpenAPI document for the nursery REST API. utoipa
//! generates the specification from Rust types and route annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::AuthContext;
use crate::error::{ApiError, ErrorCode};
use crate::routes::{
    auth, batch, dashboard, export, health, log, partner, request, seedling, status, zone,
};
use crate::types::{
    ApproveOutcome, CreateBatchRequest, CreateFulfillmentRequest, CreateLogRequest,
    CreatePartnerRequest, CreateSeedlingRequest, DeliveryNoteResponse, ListResponse, LoginRequest,
    LoginResponse, ProjectStatusResponse, RequestDetail, RequestItemInput, SkippedItem, StageInfo,
    UpdateSeedlingRequest, UpdateStageRequest,
};

use sapling_core::{
    Batch, DashboardSummary, DeliveryLine, DeliveryNote, GroupCount, NurseryLog, Partner,
    ProjectStatus, RequestItem, RequestStatus, SeasonPoint, Seedling, SeedlingRequest, Stage,
    TrendPoint, Zone,
};

/// OpenAPI document for the nursery API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sapling API",
        version = "0.3.0",
        description = "Seedling nursery record keeping - inventory, collection batches, partners, fulfillment requests, logbook and project stage",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Seedlings", description = "Seedling inventory with stock counts"),
        (name = "Batches", description = "Seed collection batches with source and GPS"),
        (name = "Partners", description = "Organizations receiving seedlings"),
        (name = "Logbook", description = "Daily nursery activity logbook"),
        (name = "Zones", description = "Nursery sub-areas (reference data)"),
        (name = "Requests", description = "Fulfillment requests: create, approve, delivery notes"),
        (name = "Project Status", description = "Project lifecycle stage"),
        (name = "Dashboard", description = "Derived statistics"),
        (name = "Export", description = "CSV downloads"),
        (name = "Auth", description = "Session tokens"),
        (name = "Health", description = "Liveness and readiness")
    ),
    paths(
        seedling::list_seedlings,
        seedling::create_seedling,
        seedling::get_seedling,
        seedling::update_seedling,
        seedling::delete_seedling,

        batch::list_batches,
        batch::create_batch,
        batch::get_batch,

        partner::list_partners,
        partner::create_partner,
        partner::get_partner,
        partner::delete_partner,

        log::list_logs,
        log::create_log,

        zone::list_zones,

        request::list_requests,
        request::create_request,
        request::get_request,
        request::approve_request,
        request::delivery_note,
        request::delete_request,

        status::get_status,
        status::update_status,

        dashboard::get_dashboard,
        export::export_entity,

        auth::login,
        auth::me,

        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            ApiError, ErrorCode,

            Seedling, Batch, Partner, Zone, NurseryLog,
            SeedlingRequest, RequestItem, ProjectStatus,
            RequestStatus, Stage,

            CreateSeedlingRequest, UpdateSeedlingRequest,
            CreateBatchRequest, CreatePartnerRequest, CreateLogRequest,
            RequestItemInput, CreateFulfillmentRequest, RequestDetail,
            SkippedItem, ApproveOutcome, DeliveryNoteResponse,
            UpdateStageRequest, ProjectStatusResponse, StageInfo,
            LoginRequest, LoginResponse, AuthContext,

            ListResponse<Seedling>, ListResponse<Batch>, ListResponse<Partner>,
            ListResponse<Zone>, ListResponse<NurseryLog>, ListResponse<SeedlingRequest>,

            DeliveryLine, DeliveryNote,
            DashboardSummary, GroupCount, TrendPoint, SeasonPoint,

            health::HealthResponse, health::HealthStatus,
            health::HealthDetails, health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier for the OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate the OpenAPI spec as a JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Sapling API");
        assert!(openapi.paths.paths.contains_key("/api/v1/requests/{id}/approve"));
        assert!(openapi.paths.paths.contains_key("/api/v1/dashboard"));
    }

    #[test]
    fn test_openapi_json_renders() {
        let json = ApiDoc::to_json().unwrap();
        assert!(json.contains("bearer_auth"));
        assert!(json.contains("/api/v1/seedlings"));
    }
}
