use mailforge_shared::{CampaignStatus, FunnelError};
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the snapshot directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lookup expected exactly one record but found none.
    #[error("Record not found")]
    NotFound,

    /// Schema creation failure.
    #[error("Schema error: {0}")]
    Schema(String),

    /// JSON encoding failure on the write path.  Decoding failures are
    /// recovered per row instead of surfacing here.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A funnel tree failed shape validation before the write.
    #[error("Invalid funnel tree: {0}")]
    Funnel(#[from] FunnelError),

    /// A record was rejected before any write was attempted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A campaign status change outside the legal lifecycle.
    #[error("Illegal campaign status transition: {from} -> {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
