//! Core entity structures
//!
//! Plain records mirroring the store relations one to one. Data only,
//! no behavior; the fulfillment service and the aggregation functions
//! operate on these.

use crate::{Day, RecordId, RequestStatus, Stage};
use serde::{Deserialize, Serialize};

/// A seedling stock line: one species at one height range.
///
/// `count` is the current stock and never goes below zero; it is only
/// decremented through the approval workflow or a direct edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Seedling {
    pub id: RecordId,
    pub species: String,
    /// Opaque range label such as "10-15"; never parsed numerically.
    pub height_range: String,
    pub count: i64,
    pub survived_count: Option<i64>,
    pub dead_count: Option<i64>,
    pub batch_id: Option<RecordId>,
    pub zone_id: Option<RecordId>,
}

/// A collection event with provenance metadata. Referenced by
/// seedlings and logbook entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Batch {
    pub id: RecordId,
    /// User-defined identifier, not unique by contract.
    pub batch_code: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub collected_at: Day,
    pub source_name: Option<String>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub note: Option<String>,
}

/// A recipient organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Partner {
    pub id: RecordId,
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// A named nursery sub-area. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Zone {
    pub id: RecordId,
    pub zone_code: String,
}

/// A logbook entry. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NurseryLog {
    pub id: RecordId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub log_date: Day,
    pub activity: String,
    pub batch_id: Option<RecordId>,
    pub zone_id: Option<RecordId>,
    pub note: Option<String>,
}

/// A partner's ask for seedlings, fulfilled by stock decrement on
/// approval. Owns its `RequestItem` children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeedlingRequest {
    pub id: RecordId,
    pub partner_id: RecordId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub request_date: Day,
    pub note: Option<String>,
    pub status: RequestStatus,
}

/// One line of a fulfillment request. Exists only as a child of a
/// `SeedlingRequest` and is deleted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RequestItem {
    pub id: RecordId,
    pub request_id: RecordId,
    pub seedling_id: RecordId,
    /// Always >= 1.
    pub quantity: i64,
}

/// The project's current lifecycle stage.
///
/// Single-row contract: the store holds exactly one row (id = 1).
/// Absence of that row is an initialization error, never a silent
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectStatus {
    pub id: RecordId,
    pub current_stage: Stage,
}
