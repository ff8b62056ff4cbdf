//! Enum types for nursery entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Status of a fulfillment request.
///
/// The only transition is `Pending -> Approved`; approval is terminal.
/// Serialized lowercase to match the store's text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
}

impl RequestStatus {
    /// Wire representation used in the `seedling_requests.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Project lifecycle stage.
///
/// A fixed ordered enumeration; the project tracks exactly one current
/// value in the single-row `project_status` relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SeedCollection,
    Propagation,
    SitePreparation,
    Planting,
}

impl Stage {
    /// All stages in timeline order.
    pub const ALL: [Stage; 4] = [
        Stage::SeedCollection,
        Stage::Propagation,
        Stage::SitePreparation,
        Stage::Planting,
    ];

    /// Wire representation used in the `project_status.current_stage` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::SeedCollection => "seed_collection",
            Stage::Propagation => "propagation",
            Stage::SitePreparation => "site_preparation",
            Stage::Planting => "planting",
        }
    }

    /// Human-readable label for timeline rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::SeedCollection => "Seed collection",
            Stage::Propagation => "Nursery propagation",
            Stage::SitePreparation => "Site preparation",
            Stage::Planting => "Planting day",
        }
    }

    /// Zero-based position of this stage in the timeline.
    pub fn position(&self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seed_collection" => Ok(Stage::SeedCollection),
            "propagation" => Ok(Stage::Propagation),
            "site_preparation" => Ok(Stage::SitePreparation),
            "planting" => Ok(Stage::Planting),
            other => Err(CoreError::UnknownStage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_round_trip() {
        for status in [RequestStatus::Pending, RequestStatus::Approved] {
            let parsed: RequestStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_request_status_rejects_unknown() {
        assert!("rejected".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_request_status_serde_lowercase() {
        let json = serde_json::to_string(&RequestStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_stage_order_is_stable() {
        assert_eq!(Stage::SeedCollection.position(), 0);
        assert_eq!(Stage::Planting.position(), 3);
        assert_eq!(Stage::ALL.len(), 4);
    }

    #[test]
    fn test_stage_round_trip() {
        for stage in Stage::ALL {
            let parsed: Stage = stage.as_str().parse().unwrap();
            assert_eq!(parsed, stage);
        }
    }

    #[test]
    fn test_stage_rejects_unknown() {
        assert!("harvest".parse::<Stage>().is_err());
    }
}
