// ABOUTME: Provider abstraction for per-day wellness metric retrieval
// ABOUTME: Operations return raw payloads because their shape varies by metric and API version
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod garmin;

pub use garmin::GarminClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::SyncResult;

/// Per-day wellness data retrieval operations.
///
/// Payloads are returned raw (`serde_json::Value`) rather than deserialized
/// into fixed structs: the same operation may return a sample sequence or an
/// aggregate object depending on API version, and the extractors in
/// [`crate::extract`] dispatch on that shape.
#[async_trait]
pub trait WellnessProvider: Send + Sync {
    /// Intraday step buckets or a daily step aggregate
    async fn steps(&self, date: NaiveDate) -> SyncResult<Value>;

    /// Daily heart-rate summary with the intraday sample series
    async fn heart_rates(&self, date: NaiveDate) -> SyncResult<Value>;

    /// Sleep summary; may nest the DTO one level deep
    async fn sleep(&self, date: NaiveDate) -> SyncResult<Value>;

    /// Body-battery charge samples or aggregate
    async fn body_battery(&self, date: NaiveDate) -> SyncResult<Value>;

    /// Stress readings or daily stress aggregate
    async fn stress(&self, date: NaiveDate) -> SyncResult<Value>;

    /// Daily user summary (calories, distance)
    async fn daily_summary(&self, date: NaiveDate) -> SyncResult<Value>;
}
