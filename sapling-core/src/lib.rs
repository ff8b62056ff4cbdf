//! Sapling Core - Domain Types
//!
//! Pure data structures and read-side computation for the seedling
//! nursery program. This crate contains no I/O: the API layer owns all
//! database round-trips and feeds full collections into the functions
//! here.

pub mod delivery;
pub mod entities;
pub mod enums;
pub mod error;
pub mod export;
pub mod stats;

pub use delivery::{DeliveryLine, DeliveryNote};
pub use entities::{
    Batch, NurseryLog, Partner, ProjectStatus, RequestItem, Seedling, SeedlingRequest, Zone,
};
pub use enums::{RequestStatus, Stage};
pub use error::{CoreError, CoreResult};
pub use export::{export_csv, export_filename};
pub use stats::{DashboardSummary, GroupCount, SeasonPoint, TrendPoint};

/// Row identifier. The store keys every relation by a generated
/// integer identity column.
pub type RecordId = i64;

/// Calendar date as stored in the `*_date` / `collected_at` columns.
pub type Day = chrono::NaiveDate;
