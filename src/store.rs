// ABOUTME: Idempotent merge-write of canonical records into Supabase
// ABOUTME: Non-success responses are logged with status and body, reported as failure, never raised
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::config::SupabaseConfig;
use crate::models::DailyHealthRecord;

/// Destination for assembled records.
///
/// A trait seam so the pipeline can run against a recording double in tests.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Upserts one record keyed by `(user_id, date)`. Returns `true` on
    /// success. Failures are logged here and reported as `false`; callers
    /// continue with the next day either way. Writes are not retried.
    async fn upsert(&self, record: &DailyHealthRecord) -> bool;
}

/// Supabase PostgREST writer
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: Client,
    endpoint: String,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(config: SupabaseConfig, client: Client) -> Self {
        let endpoint = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );
        Self {
            config,
            client,
            endpoint,
        }
    }
}

#[async_trait]
impl HealthStore for SupabaseStore {
    async fn upsert(&self, record: &DailyHealthRecord) -> bool {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.config.service_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.service_key),
            )
            // Rows sharing the (user_id, date) natural key are merged, not
            // duplicated; no representation is returned.
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(date = %record.date, "upserted daily health record");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(date = %record.date, %status, body, "store rejected upsert");
                false
            }
            Err(err) => {
                error!(date = %record.date, error = %err, "store request failed");
                false
            }
        }
    }
}
