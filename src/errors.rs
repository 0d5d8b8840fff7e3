// ABOUTME: Unified error types for the sync pipeline
// ABOUTME: Separates fatal authentication failures from transient provider errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Result alias used throughout the crate
pub type SyncResult<T> = Result<T, SyncError>;

/// Error taxonomy for a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// The provider rejected the session credential. Never retried; aborts
    /// the entire run.
    #[error("Garmin authentication failed: {0}")]
    Authentication(String),

    /// Any other provider-side failure. The fetcher retries these and then
    /// degrades to "no data for this metric".
    #[error("provider request failed: {0}")]
    Provider(String),

    /// Transport-level failure from the HTTP client
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or malformed process configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Fatal errors abort the whole run instead of degrading to a missing
    /// metric.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
