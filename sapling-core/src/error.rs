//! Core error type

use thiserror::Error;

/// Errors produced by the pure domain layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A `current_stage` column value that no Stage variant maps to.
    #[error("unknown project stage: {0}")]
    UnknownStage(String),

    /// A `status` column value that no RequestStatus variant maps to.
    #[error("unknown request status: {0}")]
    UnknownStatus(String),

    /// CSV export was asked to serialize an empty collection.
    #[error("nothing to export: collection is empty")]
    EmptyExport,

    /// CSV export rows must be flat JSON objects.
    #[error("export rows must be objects, got {0}")]
    NonObjectRow(&'static str),

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
