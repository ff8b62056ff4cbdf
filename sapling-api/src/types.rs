//! Request/Response DTO Types
//!
//! Wire types for the REST surface. Entities come straight from
//! `sapling-core`; the types here exist where the wire shape differs
//! from the stored row (create/update payloads, joined views, the
//! approve outcome).

use sapling_core::{Day, DeliveryNote, RecordId, RequestItem, SeedlingRequest, Stage};
use serde::{Deserialize, Serialize};

// ============================================================================
// SEEDLINGS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateSeedlingRequest {
    pub species: String,
    pub height_range: String,
    pub count: i64,
    pub survived_count: Option<i64>,
    pub dead_count: Option<i64>,
    pub batch_id: Option<RecordId>,
    pub zone_id: Option<RecordId>,
}

/// Partial edit; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateSeedlingRequest {
    pub species: Option<String>,
    pub height_range: Option<String>,
    pub count: Option<i64>,
    pub survived_count: Option<i64>,
    pub dead_count: Option<i64>,
    pub batch_id: Option<RecordId>,
    pub zone_id: Option<RecordId>,
}

impl UpdateSeedlingRequest {
    pub fn is_empty(&self) -> bool {
        self.species.is_none()
            && self.height_range.is_none()
            && self.count.is_none()
            && self.survived_count.is_none()
            && self.dead_count.is_none()
            && self.batch_id.is_none()
            && self.zone_id.is_none()
    }
}

// ============================================================================
// BATCHES / PARTNERS / LOGS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateBatchRequest {
    pub batch_code: String,
    #[schema(value_type = String, format = "date")]
    pub collected_at: Day,
    pub source_name: Option<String>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateLogRequest {
    #[schema(value_type = String, format = "date")]
    pub log_date: Day,
    pub activity: String,
    pub batch_id: Option<RecordId>,
    pub zone_id: Option<RecordId>,
    pub note: Option<String>,
}

// ============================================================================
// FULFILLMENT WORKFLOW
// ============================================================================

/// One requested line: which seedling, how many.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RequestItemInput {
    pub seedling_id: RecordId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateFulfillmentRequest {
    pub partner_id: RecordId,
    #[schema(value_type = String, format = "date")]
    pub request_date: Day,
    pub items: Vec<RequestItemInput>,
    pub note: Option<String>,
}

/// A request with its child items, as returned by create/get.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: SeedlingRequest,
    pub items: Vec<RequestItem>,
}

/// An item the approval pass could not fulfill: stock was below the
/// requested quantity, so the decrement was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SkippedItem {
    pub seedling_id: RecordId,
    pub requested: i64,
}

/// Outcome of the approval pass. The request transitions to approved
/// regardless; `skipped` surfaces the items best-effort fulfillment
/// left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApproveOutcome {
    pub request: SeedlingRequest,
    pub fulfilled: Vec<RecordId>,
    pub skipped: Vec<SkippedItem>,
}

/// Delivery note plus its rendered printable form.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeliveryNoteResponse {
    #[serde(flatten)]
    pub note: DeliveryNote,
    pub rendered: String,
}

// ============================================================================
// PROJECT STATUS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateStageRequest {
    pub current_stage: Stage,
}

/// Current stage plus the full ordered timeline for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProjectStatusResponse {
    pub current_stage: Stage,
    pub timeline: Vec<StageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: String,
    pub position: usize,
    /// true for every stage up to and including the current one.
    pub reached: bool,
}

impl ProjectStatusResponse {
    pub fn new(current: Stage) -> Self {
        let position = current.position();
        let timeline = Stage::ALL
            .iter()
            .map(|stage| StageInfo {
                stage: *stage,
                label: stage.label().to_string(),
                position: stage.position(),
                reached: stage.position() <= position,
            })
            .collect();
        Self {
            current_stage: current,
            timeline,
        }
    }
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

// ============================================================================
// LIST WRAPPERS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapling_core::RequestStatus;

    #[test]
    fn test_update_seedling_request_is_empty() {
        assert!(UpdateSeedlingRequest::default().is_empty());
        let patch = UpdateSeedlingRequest {
            count: Some(3),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_project_status_response_marks_reached_stages() {
        let response = ProjectStatusResponse::new(Stage::SitePreparation);
        let reached: Vec<bool> = response.timeline.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, true, true, false]);
        assert_eq!(response.timeline.len(), Stage::ALL.len());
    }

    #[test]
    fn test_list_response_counts_items() {
        let list = ListResponse::new(vec![1, 2, 3]);
        assert_eq!(list.total, 3);
    }

    #[test]
    fn test_request_detail_flattens_request_fields() {
        let detail = RequestDetail {
            request: SeedlingRequest {
                id: 7,
                partner_id: 1,
                request_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                note: None,
                status: RequestStatus::Pending,
            },
            items: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "pending");
        assert!(json["items"].is_array());
    }
}
