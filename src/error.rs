//! Run-level errors
//!
//! Only conditions with no recovery path end up here. Per-group discovery
//! failures and per-type list failures are recorded in the catalog and the
//! index instead, and validation findings are ordinary output.

use crate::catalog::DiscoveryError;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("check cancelled before completion")]
    Cancelled,

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode finding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;
