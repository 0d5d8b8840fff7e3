// ABOUTME: Main library entry point for the Garmin health sync pipeline
// ABOUTME: Fetch with bounded retry, shape-aware extraction, idempotent merge-writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Garmin Health Sync
//!
//! Pulls daily wellness metrics from Garmin Connect and upserts one canonical
//! record per (user, calendar date) into a Supabase table.
//!
//! The pipeline runs one day at a time: each metric family is fetched under a
//! bounded retry policy, extracted from its shape-polymorphic raw payload,
//! assembled into a [`models::DailyHealthRecord`], and merge-written keyed by
//! `(user_id, date)`. Absent fields are omitted from the write payload so a
//! re-run never clears previously stored values.
//!
//! ## Architecture
//!
//! - **Providers**: [`providers::WellnessProvider`] abstracts the per-day
//!   retrieval operations; [`providers::GarminClient`] implements them.
//! - **Fetch**: [`fetch::Fetcher`] applies a [`fetch::RetryPolicy`] uniformly,
//!   degrading exhausted retries to "no data" instead of failing the day.
//! - **Extract**: pure functions in [`extract`] normalize raw payloads.
//! - **Store**: [`store::SupabaseStore`] performs the idempotent upsert.

pub mod config;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod providers;
pub mod store;
pub mod sync;

pub use errors::{SyncError, SyncResult};
