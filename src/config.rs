// ABOUTME: Environment-based configuration built once at process start
// ABOUTME: Passed by reference into client and writer constructors; core modules never read ambient state
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{SyncError, SyncResult};
use std::env;
use uuid::Uuid;

/// Default number of calendar days to backfill on each run (today included)
pub const DEFAULT_DAYS_TO_SYNC: u32 = 7;

/// Default pause between days, to bound request rate against Garmin
pub const DEFAULT_DAY_PAUSE_SECS: u64 = 1;

/// Garmin Connect API access configuration.
///
/// The session token is minted by an external login step; this crate only
/// consumes it and never refreshes credentials itself.
#[derive(Debug, Clone)]
pub struct GarminConfig {
    /// Base URL of the Garmin Connect API
    pub api_base_url: String,
    /// Session token for the wellness endpoints
    pub access_token: String,
    /// Garmin display name, used as a path segment by several endpoints
    pub display_name: String,
}

/// Supabase REST endpoint configuration
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xxxx.supabase.co`
    pub base_url: String,
    /// Service role key (bypasses RLS for INSERT/UPDATE)
    pub service_key: String,
    /// Destination table name
    pub table: String,
}

/// Full process configuration for one sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub garmin: GarminConfig,
    pub supabase: SupabaseConfig,
    /// The `auth.users` UUID the records belong to
    pub user_id: Uuid,
    /// Days to backfill on each run (today + previous days)
    pub days_to_sync: u32,
    /// Pause between days in seconds
    pub day_pause_secs: u64,
}

impl SyncConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] when a required variable is missing or
    /// `SUPABASE_USER_ID` / `DAYS_TO_SYNC` cannot be parsed.
    pub fn from_env() -> SyncResult<Self> {
        let user_id = required("SUPABASE_USER_ID")?;
        let user_id = Uuid::parse_str(&user_id).map_err(|e| {
            SyncError::Config(format!("SUPABASE_USER_ID is not a valid UUID: {e}"))
        })?;

        let days_to_sync = match env::var("DAYS_TO_SYNC") {
            Ok(raw) => raw.parse::<u32>().map_err(|e| {
                SyncError::Config(format!("DAYS_TO_SYNC is not a valid day count: {e}"))
            })?,
            Err(_) => DEFAULT_DAYS_TO_SYNC,
        };

        Ok(Self {
            garmin: GarminConfig {
                api_base_url: env::var("GARMIN_API_BASE_URL")
                    .unwrap_or_else(|_| "https://connectapi.garmin.com".to_owned()),
                access_token: required("GARMIN_ACCESS_TOKEN")?,
                display_name: required("GARMIN_DISPLAY_NAME")?,
            },
            supabase: SupabaseConfig {
                base_url: required("SUPABASE_URL")?.trim_end_matches('/').to_owned(),
                service_key: required("SUPABASE_SERVICE_KEY")?,
                table: env::var("SUPABASE_TABLE")
                    .unwrap_or_else(|_| "garmin_health_data".to_owned()),
            },
            user_id,
            days_to_sync,
            day_pause_secs: DEFAULT_DAY_PAUSE_SECS,
        })
    }

    /// One-line startup summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "garmin={} store={}/rest/v1/{} user={} days={}",
            self.garmin.api_base_url,
            self.supabase.base_url,
            self.supabase.table,
            self.user_id,
            self.days_to_sync
        )
    }
}

fn required(key: &str) -> SyncResult<String> {
    env::var(key)
        .map_err(|_| SyncError::Config(format!("missing required environment variable {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_does_not_leak_secrets() {
        let config = SyncConfig {
            garmin: GarminConfig {
                api_base_url: "https://connectapi.garmin.com".into(),
                access_token: "super-secret-token".into(),
                display_name: "athlete".into(),
            },
            supabase: SupabaseConfig {
                base_url: "https://proj.supabase.co".into(),
                service_key: "service-role-secret".into(),
                table: "garmin_health_data".into(),
            },
            user_id: Uuid::nil(),
            days_to_sync: 7,
            day_pause_secs: 1,
        };

        let summary = config.summary();
        assert!(summary.contains("garmin_health_data"));
        assert!(!summary.contains("super-secret-token"));
        assert!(!summary.contains("service-role-secret"));
    }
}
